//! Source that abandons a corrupt primary for a fallback

use crate::io::error::{Result, SearchError};
use crate::stream::DigitSource;

/// Reads from `primary` until it reports a corrupt archive, then from
/// `fallback` for good
pub struct FallbackSource {
    primary: Box<dyn DigitSource>,
    fallback: Box<dyn DigitSource>,
    switched: bool,
}

impl FallbackSource {
    /// Combine a primary source with its replacement
    pub fn new(primary: Box<dyn DigitSource>, fallback: Box<dyn DigitSource>) -> Self {
        Self {
            primary,
            fallback,
            switched: false,
        }
    }

    /// Whether the fallback has taken over
    pub const fn has_switched(&self) -> bool {
        self.switched
    }
}

impl DigitSource for FallbackSource {
    fn fetch(&mut self, start: u64, length: usize) -> Result<Vec<u8>> {
        if !self.switched {
            match self.primary.fetch(start, length) {
                Err(error @ SearchError::CorruptArchive { .. }) => {
                    log::warn!(
                        "{error}; continuing from digit {start} with {}",
                        self.fallback.describe()
                    );
                    self.switched = true;
                }
                other => return other,
            }
        }
        self.fallback.fetch(start, length)
    }

    fn digit_count(&self) -> Option<u64> {
        if self.switched {
            self.fallback.digit_count()
        } else {
            self.primary.digit_count()
        }
    }

    fn describe(&self) -> String {
        if self.switched {
            self.fallback.describe()
        } else {
            format!(
                "{} (falling back to {})",
                self.primary.describe(),
                self.fallback.describe()
            )
        }
    }
}
