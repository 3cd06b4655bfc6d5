//! Wave state shared by the collapse engine and the compatibility models
//!
//! Holds the per-cell candidate sets, the dirty flags driving propagation and the
//! stationary pattern weights. Cells are addressed as `(x, y)` with `x < width`
//! and `y < height`.

use ndarray::Array2;

use crate::algorithm::bitset::PatternSet;

/// Per-cell candidate patterns, change flags and stationary weights
#[derive(Debug, Clone)]
pub struct WaveState {
    /// Patterns still possible at each cell, indexed `[x, y]`
    pub wave: Array2<PatternSet>,

    /// Cells whose candidates shrank since their constraints were last propagated
    pub changes: Array2<bool>,

    /// Relative frequency of each pattern, fixed after model construction
    pub stationary: Vec<f64>,

    /// Output dimensions (width, height) in cells
    pub dimensions: (usize, usize),
}

impl WaveState {
    /// Create a state with every pattern possible everywhere
    pub fn new(width: usize, height: usize, stationary: Vec<f64>) -> Self {
        let pattern_count = stationary.len();
        Self {
            wave: Array2::from_elem((width, height), PatternSet::all(pattern_count)),
            changes: Array2::from_elem((width, height), false),
            stationary,
            dimensions: (width, height),
        }
    }

    /// Output width in cells
    pub const fn width(&self) -> usize {
        self.dimensions.0
    }

    /// Output height in cells
    pub const fn height(&self) -> usize {
        self.dimensions.1
    }

    /// Number of patterns tracked per cell
    pub fn pattern_count(&self) -> usize {
        self.stationary.len()
    }

    /// Reset every cell to "all patterns possible" and clear all change flags
    pub fn reset(&mut self) {
        self.wave.iter_mut().for_each(PatternSet::fill);
        self.changes.fill(false);
    }

    /// Candidate set at a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<&PatternSet> {
        self.wave.get([x, y])
    }

    /// Mutable candidate set at a cell
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut PatternSet> {
        self.wave.get_mut([x, y])
    }

    /// Whether a pattern is still possible at a cell
    pub fn allows(&self, x: usize, y: usize, pattern: usize) -> bool {
        self.cell(x, y).is_some_and(|set| set.contains(pattern))
    }

    /// Remove a pattern from a cell and mark it dirty when it was present
    ///
    /// Returns whether the cell's candidates shrank.
    pub fn ban(&mut self, x: usize, y: usize, pattern: usize) -> bool {
        let removed = self
            .cell_mut(x, y)
            .is_some_and(|set| set.remove(pattern));
        if removed {
            self.mark_changed(x, y);
        }
        removed
    }

    /// Force a cell to a single pattern and mark it dirty
    pub fn collapse(&mut self, x: usize, y: usize, pattern: usize) {
        if let Some(set) = self.cell_mut(x, y) {
            set.collapse_to(pattern);
        }
        self.mark_changed(x, y);
    }

    /// Whether a cell is flagged for propagation
    pub fn is_changed(&self, x: usize, y: usize) -> bool {
        self.changes.get([x, y]).copied().unwrap_or(false)
    }

    /// Flag a cell for propagation
    pub fn mark_changed(&mut self, x: usize, y: usize) {
        if let Some(flag) = self.changes.get_mut([x, y]) {
            *flag = true;
        }
    }

    /// Clear a cell's propagation flag
    pub fn clear_changed(&mut self, x: usize, y: usize) {
        if let Some(flag) = self.changes.get_mut([x, y]) {
            *flag = false;
        }
    }

    /// Whether any cell is flagged for propagation
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|&flag| flag)
    }

    /// Stationary weights restricted to the candidates of a cell
    ///
    /// Writes into `distribution`, which must hold one slot per pattern, and
    /// returns the sum of the remaining weights.
    pub fn fill_distribution(&self, x: usize, y: usize, distribution: &mut [f64]) -> f64 {
        let mut sum = 0.0;
        for (pattern, slot) in distribution.iter_mut().enumerate() {
            *slot = if self.allows(x, y, pattern) {
                self.stationary.get(pattern).copied().unwrap_or(0.0)
            } else {
                0.0
            };
            sum += *slot;
        }
        sum
    }

    /// Number of cells reduced to exactly one pattern
    pub fn collapsed_count(&self) -> usize {
        self.wave.iter().filter(|set| set.count() == 1).count()
    }

    /// Number of cells with no pattern left
    pub fn contradiction_count(&self) -> usize {
        self.wave.iter().filter(|set| set.is_empty()).count()
    }

    /// Total number of candidate bits still set across the grid
    pub fn remaining_candidates(&self) -> usize {
        self.wave.iter().map(PatternSet::count).sum()
    }

    /// Whether every cell holds exactly one pattern
    pub fn is_fully_collapsed(&self) -> bool {
        self.wave.iter().all(|set| set.count() == 1)
    }

    /// Wrap or clip a signed coordinate against an axis length
    ///
    /// Periodic axes wrap around; otherwise out-of-range coordinates yield `None`.
    pub fn resolve_axis(coordinate: isize, length: usize, periodic: bool) -> Option<usize> {
        let length_signed = length as isize;
        if periodic && length_signed > 0 {
            Some(coordinate.rem_euclid(length_signed) as usize)
        } else if coordinate >= 0 && coordinate < length_signed {
            Some(coordinate as usize)
        } else {
            None
        }
    }
}
