//! Remote digit service fetched in bounded batches

use crate::io::configuration::{
    REMOTE_CHUNK_DIGITS, REMOTE_DIGIT_LIMIT, REMOTE_SERVICE_URL, REMOTE_TIMEOUT,
};
use crate::io::error::{Result, SearchError, unavailable};
use crate::stream::{DigitSource, decode_hex_digits};
use serde::Deserialize;
use std::time::Duration;

/// Request/response layer of the remote source
pub trait ChunkTransport {
    /// Hexadecimal text of `count` digits starting at digit index `start`
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` for any network or protocol failure
    fn get_hex(&mut self, start: u64, count: usize) -> Result<String>;
}

#[derive(Deserialize)]
struct DeliveryPayload {
    content: String,
}

/// Blocking HTTP transport for the pi.delivery API
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(REMOTE_SERVICE_URL, REMOTE_TIMEOUT)
    }
}

impl HttpTransport {
    /// Transport against `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.to_string(),
        }
    }
}

impl ChunkTransport for HttpTransport {
    fn get_hex(&mut self, start: u64, count: usize) -> Result<String> {
        // The service counts the leading "3" as position 0
        let response = self
            .agent
            .get(&self.base_url)
            .query("start", &(start + 1).to_string())
            .query("numberOfDigits", &count.to_string())
            .query("radix", "16")
            .call();

        match response {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| unavailable(start, &format!("reading response: {e}")))?;
                let payload: DeliveryPayload = serde_json::from_str(&body)
                    .map_err(|e| unavailable(start, &format!("malformed response: {e}")))?;
                Ok(payload.content)
            }
            Err(ureq::Error::Status(code, _)) => {
                Err(unavailable(start, &format!("service returned HTTP {code}")))
            }
            Err(ureq::Error::Transport(transport)) => Err(unavailable(start, &transport)),
        }
    }
}

/// Digits fetched from a remote service, at most one batch per request
pub struct RemoteSource<T: ChunkTransport = HttpTransport> {
    transport: T,
    batch_digits: usize,
    limit: u64,
}

impl Default for RemoteSource {
    fn default() -> Self {
        Self::new(HttpTransport::default())
    }
}

impl<T: ChunkTransport> RemoteSource<T> {
    /// Remote source with the service's batch size and digit limit
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            batch_digits: REMOTE_CHUNK_DIGITS,
            limit: REMOTE_DIGIT_LIMIT,
        }
    }

    /// Override the per-request batch size
    #[must_use]
    pub fn with_batch_digits(mut self, batch_digits: usize) -> Self {
        self.batch_digits = batch_digits.max(1);
        self
    }

    /// Override the number of digits the service can deliver
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

impl<T: ChunkTransport> DigitSource for RemoteSource<T> {
    fn fetch(&mut self, start: u64, length: usize) -> Result<Vec<u8>> {
        if start >= self.limit {
            return Err(SearchError::SourceExhausted { offset: start });
        }
        let remaining = usize::try_from(self.limit - start).unwrap_or(usize::MAX);
        let count = length.min(self.batch_digits).min(remaining);

        let text = self.transport.get_hex(start, count)?;
        let mut digits = decode_hex_digits(text.trim())
            .ok_or_else(|| unavailable(start, &"service returned non-hexadecimal content"))?;
        if digits.is_empty() {
            return Err(SearchError::SourceExhausted { offset: start });
        }
        digits.truncate(count);
        Ok(digits)
    }

    fn digit_count(&self) -> Option<u64> {
        Some(self.limit)
    }

    fn describe(&self) -> String {
        format!("remote service (batches of {} digits)", self.batch_digits)
    }
}
