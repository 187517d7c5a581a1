//! Digit sources and the pull-based digit stream
//!
//! Every backing store implements [`DigitSource`]; the search only ever sees
//! a [`DigitStream`], which fetches in chunks and retries transient failures.

/// Local archive strategy (plain text or zip)
pub mod archive;
/// Retrying chunked iterator over a source
pub mod digits;
/// Primary/fallback source combinator
pub mod fallback;
/// In-memory source
pub mod memory;
/// Remote digit service strategy
pub mod remote;

pub use archive::ArchiveSource;
pub use digits::{DigitStream, RetryPolicy};
pub use fallback::FallbackSource;
pub use memory::MemorySource;
pub use remote::{ChunkTransport, HttpTransport, RemoteSource};

use crate::io::error::Result;

/// Random-access supplier of hexadecimal digits of π
///
/// Digit index 0 is the first digit after the radix point.
pub trait DigitSource {
    /// Fetch up to `length` digit values (0–15) starting at `start`
    ///
    /// May return a shorter, non-empty prefix, for example at a batch limit
    /// or at the end of the source.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `start` is at or past the last available digit (`SourceExhausted`)
    /// - The source is temporarily unreachable (`SourceUnavailable`)
    /// - The backing data is malformed (`CorruptArchive`)
    fn fetch(&mut self, start: u64, length: usize) -> Result<Vec<u8>>;

    /// Number of digits available, if bounded and known
    fn digit_count(&self) -> Option<u64>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

impl<S: DigitSource + ?Sized> DigitSource for Box<S> {
    fn fetch(&mut self, start: u64, length: usize) -> Result<Vec<u8>> {
        (**self).fetch(start, length)
    }

    fn digit_count(&self) -> Option<u64> {
        (**self).digit_count()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Value of an ASCII hexadecimal digit, either case
pub const fn decode_hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Lowercase hexadecimal text for digit values
pub fn encode_hex_digits(digits: &[u8]) -> String {
    digits
        .iter()
        .filter_map(|&digit| char::from_digit(u32::from(digit), 16))
        .collect()
}

/// Digit values of hexadecimal text
///
/// Returns `None` at the first character that is not a hexadecimal digit.
pub fn decode_hex_digits(text: &str) -> Option<Vec<u8>> {
    text.bytes().map(decode_hex_digit).collect()
}
