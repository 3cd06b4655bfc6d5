use bitvec::prelude::*;
use std::fmt;

/// Fixed-size set of pattern indices still possible at one cell
///
/// Uses 0-based pattern indices matching the model catalogs.
/// Provides O(1) membership testing and removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSet {
    bits: BitVec,
}

impl PatternSet {
    /// Create a set with no patterns present
    pub fn new(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![0; pattern_count],
        }
    }

    /// Create a set containing every pattern
    pub fn all(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![1; pattern_count],
        }
    }

    /// Number of patterns the set can hold
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert a pattern index; out-of-range indices are ignored
    pub fn insert(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, true);
        }
    }

    /// Remove a pattern, returning whether it was present
    pub fn remove(&mut self, pattern: usize) -> bool {
        if self.contains(pattern) {
            self.bits.set(pattern, false);
            true
        } else {
            false
        }
    }

    /// Test pattern membership
    pub fn contains(&self, pattern: usize) -> bool {
        self.bits.get(pattern).as_deref() == Some(&true)
    }

    /// Mark every pattern possible again
    pub fn fill(&mut self) {
        self.bits.fill(true);
    }

    /// Reduce the set to a single pattern
    pub fn collapse_to(&mut self, pattern: usize) {
        self.bits.fill(false);
        self.insert(pattern);
    }

    /// Test if no patterns are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count patterns in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// The only remaining pattern, if exactly one is left
    pub fn single(&self) -> Option<usize> {
        if self.count() == 1 {
            self.bits.first_one()
        } else {
            None
        }
    }

    /// Iterate present pattern indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Test whether any pattern in `candidates` is present
    pub fn contains_any(&self, candidates: &[usize]) -> bool {
        candidates.iter().any(|&pattern| self.contains(pattern))
    }

    /// Extract all pattern indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternSet({} patterns: {:?})", self.count(), self.to_vec())
    }
}
