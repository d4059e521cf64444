//! Sudoku cell values.

use std::fmt::{self, Display};

/// A filled cell value in the range 1-9.
///
/// On the wire a digit is the single ASCII byte `b'1'..=b'9'`; see
/// [`Digit::from_ascii`] and [`Digit::to_ascii`].
///
/// # Examples
///
/// ```
/// use bridoku_core::Digit;
///
/// assert_eq!(Digit::from_ascii(b'7'), Some(Digit::D7));
/// assert_eq!(Digit::D7.to_ascii(), b'7');
/// assert_eq!(Digit::from_ascii(b'.'), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Digit {
    /// The digit 1.
    D1 = 1,
    /// The digit 2.
    D2 = 2,
    /// The digit 3.
    D3 = 3,
    /// The digit 4.
    D4 = 4,
    /// The digit 5.
    D5 = 5,
    /// The digit 6.
    D6 = 6,
    /// The digit 7.
    D7 = 7,
    /// The digit 8.
    D8 = 8,
    /// The digit 9.
    D9 = 9,
}

impl Digit {
    /// All digits in ascending order.
    pub const ALL: [Self; 9] = [
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D5,
        Self::D6,
        Self::D7,
        Self::D8,
        Self::D9,
    ];

    /// Creates a digit from its numeric value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in the range 1-9.
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        assert!(
            (1..=9).contains(&value),
            "Invalid digit value: {value}"
        );
        Self::ALL[usize::from(value - 1)]
    }

    /// Parses a digit from its ASCII byte, returning `None` for anything
    /// outside `b'1'..=b'9'`.
    #[must_use]
    pub fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'1'..=b'9' => Some(Self::from_value(byte - b'0')),
            _ => None,
        }
    }

    /// Returns the numeric value (1-9).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns the ASCII byte used for this digit in the board text format.
    #[must_use]
    pub const fn to_ascii(self) -> u8 {
        b'0' + self.value()
    }
}

impl Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value(), f)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> u8 {
        digit.value()
    }
}
