//! Window fitting: assigning window symbols to target colors and scoring the result

/// Digit-to-symbol conversion
pub mod alphabet;
/// Assignments and fit results
pub mod assignment;
/// Dominant-color mismatch policy
pub mod mismatch;
/// Fitting policy trait and the squared-distance policy
pub mod policy;

pub use alphabet::Alphabet;
pub use assignment::{Assignment, Fit, FitResult};
pub use mismatch::DominantColor;
pub use policy::{FitPolicy, Metric, SquaredDistance};
