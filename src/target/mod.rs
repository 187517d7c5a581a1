//! Target image handling
//!
//! This module contains target-related functionality including:
//! - RGB colors and the squared-distance metric
//! - Color counting and palette reduction
//! - The immutable target descriptor used by the fitter

/// RGB color values and distance metric
pub mod color;
/// Quantized target image descriptor
pub mod descriptor;
/// Color counting and palette reduction
pub mod quantize;

pub use color::Rgb;
pub use descriptor::{TargetDescriptor, TargetFingerprint};
pub use quantize::QuantizeMode;
