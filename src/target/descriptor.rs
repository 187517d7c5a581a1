//! Quantized target image: per-pixel reference color indices in row-major order

use crate::io::configuration::MAX_TARGET_COLORS;
use crate::io::error::{Result, SearchError, invalid_parameter};
use crate::target::color::Rgb;
use crate::target::quantize::{ColorCounts, QuantizeMode, nearest_color, reduce_colors};
use image::RgbImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable description of the image being searched for
///
/// Pixel `k` of a window corresponds to the `k`-th pixel of the pattern in
/// row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetDescriptor {
    pattern: Array2<usize>,
    colors: Vec<Rgb>,
    distances: Array2<u32>,
}

/// Identity of a target, stored with persisted search state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFingerprint {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Reference colors in index order
    pub colors: Vec<Rgb>,
    /// Pattern rows, one digit per pixel
    pub pattern: Vec<String>,
}

impl TargetDescriptor {
    /// Build a descriptor from a `(height, width)` grid of color indices
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The grid is empty
    /// - The palette is empty or holds more than [`MAX_TARGET_COLORS`] colors
    /// - A grid cell refers to a color outside the palette
    pub fn new(pattern: Array2<usize>, colors: Vec<Rgb>) -> Result<Self> {
        if pattern.is_empty() {
            return Err(invalid_parameter(
                "target",
                &format!("{:?}", pattern.dim()),
                &"target has no pixels",
            ));
        }
        if colors.is_empty() {
            return Err(invalid_parameter(
                "colors",
                &0,
                &"target has no reference colors",
            ));
        }
        if colors.len() > MAX_TARGET_COLORS {
            return Err(SearchError::TooManyColors {
                found: colors.len(),
                max: MAX_TARGET_COLORS,
            });
        }
        if let Some(&index) = pattern.iter().find(|&&index| index >= colors.len()) {
            return Err(invalid_parameter(
                "pattern",
                &index,
                &format!("only {} reference colors", colors.len()),
            ));
        }

        let distances = Array2::from_shape_fn((colors.len(), colors.len()), |(a, b)| {
            match (colors.get(a), colors.get(b)) {
                (Some(&first), Some(&second)) => first.distance_squared(second),
                _ => 0,
            }
        });

        Ok(Self {
            pattern,
            colors,
            distances,
        })
    }

    /// Quantize a decoded image into a descriptor
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image has more than `max_pixels` pixels
    /// - The image colors cannot be reduced under `mode`
    pub fn from_image(image: &RgbImage, mode: QuantizeMode, max_pixels: usize) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let pixels = width * height;
        if pixels > max_pixels {
            return Err(SearchError::ImageTooLarge { pixels, max_pixels });
        }

        let counts = ColorCounts::from_pixels(image.pixels().map(|&pixel| Rgb::from(pixel)));
        let colors = reduce_colors(&counts, mode)?;

        let mut pattern = Array2::zeros((height, width));
        for (x, y, &pixel) in image.enumerate_pixels() {
            if let Some(cell) = pattern.get_mut((y as usize, x as usize)) {
                *cell = nearest_color(&colors, Rgb::from(pixel));
            }
        }

        Self::new(pattern, colors)
    }

    /// Load and quantize a target image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or fails the checks of
    /// [`TargetDescriptor::from_image`]
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        mode: QuantizeMode,
        max_pixels: usize,
    ) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let img = image::open(&path_buf).map_err(|e| SearchError::ImageLoad {
            path: path_buf,
            source: e,
        })?;
        Self::from_image(&img.to_rgb8(), mode, max_pixels)
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pattern.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pattern.nrows()
    }

    /// Number of pixels, which is also the window length in symbols
    pub fn pixel_count(&self) -> usize {
        self.pattern.len()
    }

    /// Reference colors in index order
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of reference colors
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Reference color at `index`
    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Grid of color indices, shaped `(height, width)`
    pub const fn pattern(&self) -> &Array2<usize> {
        &self.pattern
    }

    /// Color indices in row-major pixel order
    pub fn pixel_colors(&self) -> impl Iterator<Item = usize> + '_ {
        self.pattern.iter().copied()
    }

    /// Squared distance between two reference colors
    pub fn distance(&self, a: usize, b: usize) -> u32 {
        self.distances.get((a, b)).copied().unwrap_or(0)
    }

    /// Pixel count per reference color
    pub fn color_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.colors.len()];
        for index in self.pixel_colors() {
            if let Some(count) = histogram.get_mut(index) {
                *count += 1;
            }
        }
        histogram
    }

    /// Pattern rendered as one line of color digits per row
    pub fn pattern_lines(&self) -> Vec<String> {
        self.pattern
            .rows()
            .into_iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    /// Identity used to match persisted state against this target
    pub fn fingerprint(&self) -> TargetFingerprint {
        TargetFingerprint {
            width: self.width(),
            height: self.height(),
            colors: self.colors.clone(),
            pattern: self.pattern_lines(),
        }
    }

    /// The quantized target as an image
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            self.pattern
                .get((y as usize, x as usize))
                .and_then(|&index| self.color(index))
                .unwrap_or_default()
                .into()
        })
    }
}
