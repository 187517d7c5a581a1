//! Symbol-to-color assignments and scored fit results

use serde::{Deserialize, Serialize};

/// Mapping from each window symbol to a reference color index
///
/// Symbols that do not occur in the window stay unassigned; they never
/// contribute to a score and never appear in a rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    colors: Vec<Option<usize>>,
}

impl Assignment {
    /// An assignment over `alphabet_size` symbols with nothing assigned
    pub fn unassigned(alphabet_size: usize) -> Self {
        Self {
            colors: vec![None; alphabet_size],
        }
    }

    /// Build from explicit per-symbol colors
    pub const fn from_colors(colors: Vec<Option<usize>>) -> Self {
        Self { colors }
    }

    /// Color assigned to `symbol`
    pub fn get(&self, symbol: u8) -> Option<usize> {
        self.colors.get(usize::from(symbol)).copied().flatten()
    }

    /// Assign `symbol` to `color`
    pub fn set(&mut self, symbol: u8, color: usize) {
        if let Some(slot) = self.colors.get_mut(usize::from(symbol)) {
            *slot = Some(color);
        }
    }

    /// Size of the symbol space
    pub fn alphabet_size(&self) -> usize {
        self.colors.len()
    }

    /// Number of symbols currently assigned to `color`
    pub fn load(&self, color: usize) -> usize {
        self.colors.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Assigned `(symbol, color)` pairs in symbol order
    pub fn assigned(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .filter_map(|(symbol, &color)| color.map(|c| (symbol as u8, c)))
    }
}

/// Outcome of fitting one window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    /// Least-error assignment found by the policy
    pub assignment: Assignment,
    /// Non-negative error, zero for a perfect window
    pub error_score: f64,
}

/// A scored window anchored at its first digit index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Digit index of the window's first digit
    pub start_index: u64,
    /// Symbol-to-color assignment
    pub assignment: Assignment,
    /// Non-negative error, zero for a perfect window
    pub error_score: f64,
}

impl FitResult {
    /// Anchor a fit at `start_index`
    pub fn new(start_index: u64, fit: Fit) -> Self {
        Self {
            start_index,
            assignment: fit.assignment,
            error_score: fit.error_score,
        }
    }

    /// Whether the window reproduces the target exactly
    pub fn is_perfect(&self) -> bool {
        self.error_score <= 0.0
    }

    /// Strictly lower score, or equal score at a lower start index
    pub fn outranks(&self, other: &Self) -> bool {
        self.error_score < other.error_score
            || (self.error_score <= other.error_score && self.start_index < other.start_index)
    }
}
