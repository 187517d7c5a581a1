//! Search the hexadecimal digits of π for a window that, under a best-fitting
//! assignment of digit symbols to a small palette, looks like a target image
//!
//! A [`target::TargetDescriptor`] fixes the target's shape and palette, a
//! [`stream::DigitStream`] supplies digits from a local archive or a remote
//! service, and the [`search::SearchEngine`] slides a window over them,
//! fitting each window with a [`fitting::FitPolicy`] and keeping the best.

#![forbid(unsafe_code)]

/// Window fitting policies, alphabets and fit results
pub mod fitting;
/// Input/output operations and error handling
pub mod io;
/// Sliding-window search, best tracking and resumable state
pub mod search;
/// Digit sources and the retrying digit stream
pub mod stream;
/// Target image loading, quantization and description
pub mod target;

pub use io::error::{Result, SearchError};
