//! Dominant-color policy: count pixels that disagree with their symbol's majority

use crate::fitting::alphabet::Alphabet;
use crate::fitting::assignment::Fit;
use crate::fitting::policy::{FitPolicy, assign_by_cost, symbol_color_counts};
use crate::target::descriptor::TargetDescriptor;

/// Each symbol takes its most frequent color; the score is the number of
/// mismatched pixels
///
/// Pixels whose symbol spans every reference color are "muddled" and add a
/// fraction below one, so they only separate windows with equal mismatches.
#[derive(Clone, Copy, Debug, Default)]
pub struct DominantColor;

impl FitPolicy for DominantColor {
    fn name(&self) -> &'static str {
        "dominant"
    }

    fn fit(&self, target: &TargetDescriptor, symbols: &[u8], alphabet: Alphabet) -> Fit {
        let counts = symbol_color_counts(target, symbols, alphabet);
        let assignment = assign_by_cost(&counts, alphabet, |row| {
            row.iter().map(|&count| -i64::from(count)).collect()
        });

        let mut mismatches = 0u64;
        let mut muddled = 0u64;
        for (symbol, row) in counts.rows().into_iter().enumerate() {
            let Some(assigned) = assignment.get(symbol as u8) else {
                continue;
            };
            let total = u64::from(row.sum());
            let kept = row.get(assigned).copied().map_or(0, u64::from);
            mismatches += total - kept;
            if target.color_count() > 1 && row.iter().all(|&count| count > 0) {
                muddled += total;
            }
        }

        let pixels = target.pixel_count() as f64;
        Fit {
            assignment,
            error_score: mismatches as f64 + muddled as f64 / (pixels + 1.0),
        }
    }
}
