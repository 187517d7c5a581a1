//! Search constants and runtime configuration defaults

use std::time::Duration;

// Target limits
/// Maximum number of reference colors in a target
pub const MAX_TARGET_COLORS: usize = 6;
/// Default ceiling on target pixel count
pub const DEFAULT_MAX_PIXELS: usize = 500;
/// Smallest color count accepted for most-common quantization
pub const MIN_QUANTIZED_COLORS: usize = 3;

// Color family merging starts strict and loosens while nothing merges
/// Initial squared distance under which colors join a family
pub const FAMILY_BASE_DISTANCE: u32 = 250;
/// Threshold increase applied after a pass that merged nothing
pub const FAMILY_DISTANCE_STEP: u32 = 20;
/// Threshold at which family merging gives up
pub const FAMILY_MAX_DISTANCE: u32 = 1000;
/// Families covering at most this fraction of pixels are dropped
pub const FAMILY_SIEVE_FRACTION: f64 = 0.01;
/// Families covering at most this many pixels are always dropped
pub const FAMILY_SIEVE_MIN_PIXELS: usize = 2;

// Digit sources
/// Name of the plain text digit archive
pub const ARCHIVE_TEXT_NAME: &str = "pi_hex_1b.txt";
/// Name of the zipped digit archive
pub const ARCHIVE_ZIP_NAME: &str = "pi_hex_1b.zip";
/// Prefix preceding the fractional digits in the archive
pub const ARCHIVE_HEADER: &[u8; 2] = b"3.";
/// Digits requested from a local archive per read
pub const ARCHIVE_CHUNK_DIGITS: usize = 1 << 20;
/// Endpoint of the remote digit service
pub const REMOTE_SERVICE_URL: &str = "https://api.pi.delivery/v1/pi";
/// Largest digit count the remote service returns per request
pub const REMOTE_CHUNK_DIGITS: usize = 1000;
/// Number of hexadecimal digits the remote service can deliver
pub const REMOTE_DIGIT_LIMIT: u64 = 50_000_000_000_000;
/// Per-request timeout for the remote service
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(20);

// Retry behaviour for transient source failures
/// Attempts per chunk before a transient failure becomes fatal
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 6;
/// Delay before the first retry
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
/// Upper bound on the backoff delay
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

// Search loop
/// Digits the window advances per step
pub const DEFAULT_STRIDE: u64 = 1;
/// Largest stride accepted; skipped digits are still read from the source
pub const MAX_STRIDE: u64 = 1 << 32;
/// Digits between persisted checkpoints of the resume index
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 1_000_000;
/// Digits between progress display refreshes
pub const PROGRESS_REFRESH_INTERVAL: u64 = 5000;

// Output settings
/// Default target image path
pub const DEFAULT_TARGET: &str = "target.png";
/// Default rendered artifact path
pub const DEFAULT_OUTPUT: &str = "found.gif";
/// Default persisted state path
pub const DEFAULT_STATE: &str = "found.json";
/// Version tag written into the state file
pub const STATE_FORMAT_VERSION: u32 = 1;
