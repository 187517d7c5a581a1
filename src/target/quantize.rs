//! Color counting and reduction of target images to a small reference palette

use crate::io::configuration::{
    FAMILY_BASE_DISTANCE, FAMILY_DISTANCE_STEP, FAMILY_MAX_DISTANCE, FAMILY_SIEVE_FRACTION,
    FAMILY_SIEVE_MIN_PIXELS, MAX_TARGET_COLORS, MIN_QUANTIZED_COLORS,
};
use crate::io::error::{Result, SearchError, invalid_parameter};
use crate::target::color::Rgb;
use std::collections::HashMap;

/// Policy for targets with more distinct colors than the search supports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuantizeMode {
    /// Refuse the target
    #[default]
    Reject,
    /// Keep only the given number of most frequent colors
    MostCommon(usize),
    /// Merge nearby colors into families and drop negligible ones
    Families,
}

/// Distinct colors of an image with their pixel counts, in first-appearance order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorCounts {
    entries: Vec<(Rgb, usize)>,
}

impl ColorCounts {
    /// Count colors of pixels given in row-major order
    pub fn from_pixels(pixels: impl IntoIterator<Item = Rgb>) -> Self {
        let mut positions: HashMap<Rgb, usize> = HashMap::new();
        let mut entries: Vec<(Rgb, usize)> = Vec::new();
        for color in pixels {
            if let Some(&position) = positions.get(&color) {
                if let Some(entry) = entries.get_mut(position) {
                    entry.1 += 1;
                }
            } else {
                positions.insert(color, entries.len());
                entries.push((color, 1));
            }
        }
        Self { entries }
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pixels were counted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of pixels counted
    pub fn total(&self) -> usize {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    /// Colors in first-appearance order
    pub fn colors(&self) -> Vec<Rgb> {
        self.entries.iter().map(|&(color, _)| color).collect()
    }

    /// Colors with counts, most frequent first, ties in first-appearance order
    pub fn most_common(&self) -> Vec<(Rgb, usize)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// Pick the reference palette for a target
///
/// Targets already within [`MAX_TARGET_COLORS`] keep their colors in
/// first-appearance order regardless of `mode`.
///
/// # Errors
///
/// Returns an error if:
/// - The target has too many colors and `mode` is [`QuantizeMode::Reject`]
/// - Family merging cannot get down to [`MAX_TARGET_COLORS`]
/// - A most-common count outside the supported range is requested
pub fn reduce_colors(counts: &ColorCounts, mode: QuantizeMode) -> Result<Vec<Rgb>> {
    if counts.len() <= MAX_TARGET_COLORS {
        return Ok(counts.colors());
    }

    match mode {
        QuantizeMode::Reject => Err(SearchError::TooManyColors {
            found: counts.len(),
            max: MAX_TARGET_COLORS,
        }),
        QuantizeMode::MostCommon(limit) => {
            if !(MIN_QUANTIZED_COLORS..=MAX_TARGET_COLORS).contains(&limit) {
                return Err(invalid_parameter(
                    "colors",
                    &limit,
                    &format!("must be between {MIN_QUANTIZED_COLORS} and {MAX_TARGET_COLORS}"),
                ));
            }
            Ok(counts
                .most_common()
                .into_iter()
                .take(limit)
                .map(|(color, _)| color)
                .collect())
        }
        QuantizeMode::Families => {
            let colors = reduce_families(counts);
            if colors.len() > MAX_TARGET_COLORS {
                Err(SearchError::TooManyColors {
                    found: colors.len(),
                    max: MAX_TARGET_COLORS,
                })
            } else {
                Ok(colors)
            }
        }
    }
}

/// Group colors whose squared distance to a family head is below `threshold`
///
/// Input must be ordered most frequent first; each family head is its most
/// frequent member. Families are returned as their count-weighted average with
/// the summed count, in creation order.
pub fn color_families(most_common: &[(Rgb, usize)], threshold: u32) -> Vec<(Rgb, usize)> {
    let mut families: Vec<(Rgb, Vec<(Rgb, usize)>)> = Vec::new();
    for &(color, count) in most_common {
        match families
            .iter_mut()
            .find(|(head, _)| head.distance_squared(color) < threshold)
        {
            Some((_, members)) => members.push((color, count)),
            None => families.push((color, vec![(color, count)])),
        }
    }

    families
        .into_iter()
        .map(|(_, members)| {
            let total = members.iter().map(|&(_, count)| count).sum();
            (Rgb::weighted_average(members), total)
        })
        .collect()
}

// Loosens the family threshold until few enough colors remain or the limit is hit
fn reduce_families(counts: &ColorCounts) -> Vec<Rgb> {
    let mut families = counts.most_common();
    let mut previous = families.len() + 1;
    let mut threshold = FAMILY_BASE_DISTANCE;

    while families.len() > MAX_TARGET_COLORS && threshold < FAMILY_MAX_DISTANCE {
        if families.len() == previous {
            threshold += FAMILY_DISTANCE_STEP;
        }
        previous = families.len();
        let merged = ColorCounts { entries: families };
        families = color_families(&merged.most_common(), threshold);
    }

    sieve_colors(&families, counts.total())
}

/// Drop colors covering a negligible share of the pixels
///
/// Falls back to every color when the sieve would leave none.
pub fn sieve_colors(families: &[(Rgb, usize)], pixel_count: usize) -> Vec<Rgb> {
    let threshold =
        ((FAMILY_SIEVE_FRACTION * pixel_count as f64).round() as usize).max(FAMILY_SIEVE_MIN_PIXELS);
    let kept: Vec<Rgb> = families
        .iter()
        .filter(|&&(_, count)| count > threshold)
        .map(|&(color, _)| color)
        .collect();

    if kept.is_empty() {
        families.iter().map(|&(color, _)| color).collect()
    } else {
        kept
    }
}

/// Index of the palette color closest to `color`, ties to the lower index
pub fn nearest_color(palette: &[Rgb], color: Rgb) -> usize {
    palette
        .iter()
        .enumerate()
        .min_by_key(|&(index, &candidate)| (candidate.distance_squared(color), index))
        .map_or(0, |(index, _)| index)
}
