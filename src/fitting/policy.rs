//! Window fitting policies and the default squared-distance policy
//!
//! Every policy builds the same symbol-by-color count table and assigns each
//! symbol independently. Symbols are visited in ascending order; among colors
//! of equal cost the one already serving fewer symbols wins, then the lower
//! color index. This keeps every fit a pure function of its inputs.

use crate::fitting::alphabet::Alphabet;
use crate::fitting::assignment::{Assignment, Fit};
use crate::fitting::mismatch::DominantColor;
use crate::target::color::ColorSum;
use crate::target::descriptor::TargetDescriptor;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy computing the best assignment and its error for one window
pub trait FitPolicy {
    /// Short name recorded in persisted state
    fn name(&self) -> &'static str;

    /// Fit `symbols` (one per target pixel, row-major) to `target`
    fn fit(&self, target: &TargetDescriptor, symbols: &[u8], alphabet: Alphabet) -> Fit;
}

/// Selectable fitting policies
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Summed squared color distance
    #[default]
    Squared,
    /// Pixels not matching their symbol's most frequent color
    Dominant,
}

impl Metric {
    /// Instantiate the policy
    pub fn policy(self) -> Box<dyn FitPolicy> {
        match self {
            Self::Squared => Box::new(SquaredDistance),
            Self::Dominant => Box::new(DominantColor),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Squared => write!(f, "squared"),
            Self::Dominant => write!(f, "dominant"),
        }
    }
}

/// Count table shaped `(alphabet size, color count)`: how many pixels of each
/// reference color fall on each symbol
pub fn symbol_color_counts(
    target: &TargetDescriptor,
    symbols: &[u8],
    alphabet: Alphabet,
) -> Array2<u32> {
    debug_assert_eq!(
        symbols.len(),
        target.pixel_count(),
        "window length must equal the target pixel count"
    );

    let mut counts = Array2::zeros((alphabet.size(), target.color_count()));
    for (&symbol, color) in symbols.iter().zip(target.pixel_colors()) {
        if let Some(count) = counts.get_mut((usize::from(symbol), color)) {
            *count += 1;
        }
    }
    counts
}

/// Assign every used symbol the color of least cost
///
/// `cost` receives a symbol's row of the count table and returns one cost per
/// reference color.
pub fn assign_by_cost<F>(counts: &Array2<u32>, alphabet: Alphabet, cost: F) -> Assignment
where
    F: Fn(ArrayView1<'_, u32>) -> Vec<i64>,
{
    let mut assignment = Assignment::unassigned(alphabet.size());
    let mut loads = vec![0usize; counts.ncols()];

    for (symbol, row) in counts.rows().into_iter().enumerate() {
        if row.sum() == 0 {
            continue;
        }
        let best = cost(row)
            .into_iter()
            .enumerate()
            .min_by_key(|&(color, value)| (value, loads.get(color).copied().unwrap_or(0), color))
            .map(|(color, _)| color);

        if let Some(color) = best {
            assignment.set(symbol as u8, color);
            if let Some(load) = loads.get_mut(color) {
                *load += 1;
            }
        }
    }
    assignment
}

/// Default policy: each symbol takes the reference color nearest to the
/// centroid of the colors it covers, scored by summed squared distance
///
/// The nearest color to the centroid is also the color minimizing the
/// symbol's summed squared error, so the per-symbol choice is optimal.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredDistance;

impl FitPolicy for SquaredDistance {
    fn name(&self) -> &'static str {
        "squared"
    }

    fn fit(&self, target: &TargetDescriptor, symbols: &[u8], alphabet: Alphabet) -> Fit {
        let counts = symbol_color_counts(target, symbols, alphabet);

        let assignment = assign_by_cost(&counts, alphabet, |row| {
            let mut centroid = ColorSum::default();
            for (&count, &color) in row.iter().zip(target.colors()) {
                centroid.add(color, count);
            }
            target
                .colors()
                .iter()
                .map(|&color| centroid.scaled_distance(color))
                .collect()
        });

        let mut error = 0u64;
        for (symbol, row) in counts.rows().into_iter().enumerate() {
            let Some(assigned) = assignment.get(symbol as u8) else {
                continue;
            };
            for (color, &count) in row.iter().enumerate() {
                error += u64::from(count) * u64::from(target.distance(color, assigned));
            }
        }

        Fit {
            assignment,
            error_score: error as f64,
        }
    }
}
