//! Pull-based digit stream with chunked fetches and retry on transient failure

use crate::io::configuration::{
    ARCHIVE_CHUNK_DIGITS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY,
    DEFAULT_RETRY_MAX_DELAY,
};
use crate::io::error::{Result, SearchError};
use crate::stream::DigitSource;
use std::thread;
use std::time::Duration;

/// Exponential backoff for transient source failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per chunk, including the first
    pub attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Retry without waiting
    pub const fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay after the given zero-based failed attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Forward iterator over digits of a [`DigitSource`]
///
/// Yields `Ok(digit)` until the source is exhausted, then `None`. A failure
/// that survives the retry policy is yielded as `Err` and leaves the stream
/// positioned at the failed digit, so iteration may be attempted again.
pub struct DigitStream {
    source: Box<dyn DigitSource>,
    retry: RetryPolicy,
    chunk_digits: usize,
    buffer: Vec<u8>,
    cursor: usize,
    next_fetch: u64,
    finished: bool,
}

impl DigitStream {
    /// Stream digits of `source` beginning at digit index `start`
    pub fn new(source: Box<dyn DigitSource>, start: u64) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            chunk_digits: ARCHIVE_CHUNK_DIGITS,
            buffer: Vec::new(),
            cursor: 0,
            next_fetch: start,
            finished: false,
        }
    }

    /// Replace the retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the number of digits requested per fetch
    #[must_use]
    pub fn with_chunk_digits(mut self, chunk_digits: usize) -> Self {
        self.chunk_digits = chunk_digits.max(1);
        self
    }

    /// Digit index of the next digit to be yielded
    pub fn next_index(&self) -> u64 {
        self.next_fetch - (self.buffer.len() - self.cursor) as u64
    }

    /// Known digit count of the underlying source
    pub fn digit_count(&self) -> Option<u64> {
        self.source.digit_count()
    }

    /// Description of the underlying source
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Read `length` digits starting at `start`, repositioning the stream
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than `length` digits remain (`SourceExhausted`)
    /// - The source keeps failing or is corrupt
    pub fn window(&mut self, start: u64, length: usize) -> Result<Vec<u8>> {
        self.buffer.clear();
        self.cursor = 0;
        self.next_fetch = start;
        self.finished = false;

        let mut digits = Vec::with_capacity(length);
        while digits.len() < length {
            match self.next() {
                Some(digit) => digits.push(digit?),
                None => {
                    return Err(SearchError::SourceExhausted {
                        offset: start + digits.len() as u64,
                    });
                }
            }
        }
        Ok(digits)
    }

    fn fetch_with_retry(&mut self) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.source.fetch(self.next_fetch, self.chunk_digits) {
                Err(error) if error.is_transient() && attempt + 1 < self.retry.attempts => {
                    let delay = self.retry.delay(attempt);
                    attempt += 1;
                    log::warn!(
                        "{error}; retrying in {delay:?} (attempt {} of {})",
                        attempt + 1,
                        self.retry.attempts
                    );
                    thread::sleep(delay);
                }
                other => return other,
            }
        }
    }
}

impl Iterator for DigitStream {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.buffer.len() {
            if self.finished {
                return None;
            }
            match self.fetch_with_retry() {
                Ok(chunk) if !chunk.is_empty() => {
                    self.next_fetch += chunk.len() as u64;
                    self.buffer = chunk;
                    self.cursor = 0;
                }
                Ok(_) | Err(SearchError::SourceExhausted { .. }) => {
                    self.finished = true;
                    return None;
                }
                Err(error) => return Some(Err(error)),
            }
        }

        let digit = self.buffer.get(self.cursor).copied();
        self.cursor += 1;
        digit.map(Ok)
    }
}
