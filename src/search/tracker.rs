//! Single-writer holder of the best fit seen so far

use crate::fitting::assignment::FitResult;

/// Whether an offered result replaced the best
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The result is the new best
    Improved,
    /// The previous best stands
    Unimproved,
}

/// Best fit observed over a run
///
/// The held score never increases. Equal scores keep the earlier result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BestTracker {
    best: Option<FitResult>,
    offered: u64,
}

impl BestTracker {
    /// Empty tracker
    pub const fn new() -> Self {
        Self {
            best: None,
            offered: 0,
        }
    }

    /// Tracker continuing from a previously found best
    pub const fn resume(best: Option<FitResult>) -> Self {
        Self { best, offered: 0 }
    }

    /// Consider a result, keeping it only if strictly better than the best
    pub fn offer(&mut self, result: FitResult) -> Step {
        self.offered += 1;
        match &self.best {
            Some(best) if result.error_score >= best.error_score => Step::Unimproved,
            _ => {
                self.best = Some(result);
                Step::Improved
            }
        }
    }

    /// Fold in the best of another tracker covering a different range
    ///
    /// Lower score wins; equal scores go to the lower start index.
    pub fn merge(&mut self, other: Self) {
        self.offered += other.offered;
        if let Some(candidate) = other.best {
            let replace = self
                .best
                .as_ref()
                .is_none_or(|best| candidate.outranks(best));
            if replace {
                self.best = Some(candidate);
            }
        }
    }

    /// Best result so far
    pub const fn best(&self) -> Option<&FitResult> {
        self.best.as_ref()
    }

    /// Score of the best result so far
    pub fn best_score(&self) -> Option<f64> {
        self.best.as_ref().map(|best| best.error_score)
    }

    /// Number of results offered during this run
    pub const fn offered(&self) -> u64 {
        self.offered
    }
}
