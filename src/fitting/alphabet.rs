//! Conversion of raw hexadecimal digits into window symbols

use serde::{Deserialize, Serialize};
use std::fmt;

/// How consecutive digits are grouped into one pixel symbol
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// One hexadecimal digit per pixel (16 symbols)
    #[default]
    Nibble,
    /// Two hexadecimal digits per pixel (256 symbols)
    Byte,
}

impl Alphabet {
    /// Number of distinct symbols
    pub const fn size(self) -> usize {
        match self {
            Self::Nibble => 16,
            Self::Byte => 256,
        }
    }

    /// Digits consumed by one symbol
    pub const fn digits_per_symbol(self) -> usize {
        match self {
            Self::Nibble => 1,
            Self::Byte => 2,
        }
    }

    /// Digits spanned by a window of `pixels` symbols
    pub const fn window_digits(self, pixels: usize) -> usize {
        pixels * self.digits_per_symbol()
    }

    /// Replace the contents of `out` with the symbols encoded by `digits`
    ///
    /// In byte mode the first digit of each pair is the high nibble; a trailing
    /// unpaired digit is ignored.
    pub fn fill_symbols(self, digits: &[u8], out: &mut Vec<u8>) {
        out.clear();
        match self {
            Self::Nibble => out.extend_from_slice(digits),
            Self::Byte => out.extend(digits.chunks_exact(2).map(|pair| match *pair {
                [high, low] => (high << 4) | low,
                _ => 0,
            })),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nibble => write!(f, "nibble"),
            Self::Byte => write!(f, "byte"),
        }
    }
}
