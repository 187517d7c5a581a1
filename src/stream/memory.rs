//! Fixed in-memory digit source

use crate::io::error::{Result, SearchError, invalid_parameter};
use crate::stream::{DigitSource, decode_hex_digits};

/// Digits held in memory, bounded by their length
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySource {
    digits: Vec<u8>,
}

impl MemorySource {
    /// Wrap digit values
    ///
    /// # Errors
    ///
    /// Returns an error if any value is not a hexadecimal digit (0–15)
    pub fn new(digits: Vec<u8>) -> Result<Self> {
        if let Some(&bad) = digits.iter().find(|&&digit| digit > 0xF) {
            return Err(invalid_parameter(
                "digits",
                &bad,
                &"digit values must be below 16",
            ));
        }
        Ok(Self { digits })
    }

    /// Parse hexadecimal text
    ///
    /// # Errors
    ///
    /// Returns an error if the text contains a non-hexadecimal character
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = decode_hex_digits(text).ok_or_else(|| {
            invalid_parameter("digits", &text, &"expected only hexadecimal characters")
        })?;
        Ok(Self { digits })
    }

    /// All digits held by the source
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }
}

impl DigitSource for MemorySource {
    fn fetch(&mut self, start: u64, length: usize) -> Result<Vec<u8>> {
        let tail = usize::try_from(start)
            .ok()
            .and_then(|offset| self.digits.get(offset..))
            .filter(|tail| !tail.is_empty())
            .ok_or(SearchError::SourceExhausted { offset: start })?;
        Ok(tail.iter().take(length).copied().collect())
    }

    fn digit_count(&self) -> Option<u64> {
        Some(self.digits.len() as u64)
    }

    fn describe(&self) -> String {
        format!("{} digits in memory", self.digits.len())
    }
}
