//! RGB color values and the squared-distance color metric

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque 8-bit RGB color
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Sum of squared per-channel differences
    pub fn distance_squared(self, other: Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum()
    }

    /// Count-weighted mean of colors, rounded per channel
    ///
    /// Returns black when the total weight is zero.
    pub fn weighted_average(weights: impl IntoIterator<Item = (Self, usize)>) -> Self {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for (color, count) in weights {
            for (sum, &channel) in sums.iter_mut().zip(color.0.iter()) {
                *sum += u64::from(channel) * count as u64;
            }
            total += count as u64;
        }
        if total == 0 {
            return Self::default();
        }
        let [r, g, b] = sums.map(|sum| ((sum as f64) / (total as f64)).round() as u8);
        Self::new(r, g, b)
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self(pixel.0)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(color: Rgb) -> Self {
        Self(color.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// Channel sums of a group of colors, used to compare a group centroid against
/// candidate colors without leaving integer arithmetic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorSum {
    sums: [i64; 3],
    count: i64,
}

impl ColorSum {
    /// Add `count` copies of `color`
    pub fn add(&mut self, color: Rgb, count: u32) {
        let count = i64::from(count);
        for (sum, &channel) in self.sums.iter_mut().zip(color.0.iter()) {
            *sum += i64::from(channel) * count;
        }
        self.count += count;
    }

    /// Squared distance from the centroid to `color`, scaled by `count²`
    ///
    /// Ordering by this value is the same as ordering by the true centroid
    /// distance, and equal values are exact ties.
    pub fn scaled_distance(&self, color: Rgb) -> i64 {
        self.sums
            .iter()
            .zip(color.0.iter())
            .map(|(&sum, &channel)| {
                let d = sum - self.count * i64::from(channel);
                d * d
            })
            .sum()
    }
}
