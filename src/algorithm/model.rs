//! Capability interface between the collapse engine and a compatibility model

use crate::spatial::{PixelGrid, WaveState};

/// Result of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Iteration budget exhausted with no contradiction and cells still open
    #[default]
    Incomplete,
    /// Every observable cell collapsed to a single pattern
    Success,
    /// Some cell ran out of candidate patterns
    Contradiction,
}

impl Outcome {
    /// Whether the run has stopped, successfully or not
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Incomplete)
    }
}

/// Compatibility model driven by the generic collapse engine
///
/// The engine owns the [`WaveState`] and calls back into the model for everything
/// that depends on pattern semantics. Models are immutable after construction.
pub trait Model {
    /// Output size in cells (width, height)
    fn dimensions(&self) -> (usize, usize);

    /// Stationary weight of every pattern, one entry per pattern
    fn stationary(&self) -> &[f64];

    /// Whether a cell is excluded from observation
    fn on_boundary(&self, x: usize, y: usize) -> bool;

    /// Run one propagation sweep over the dirty cells
    ///
    /// Returns whether any candidate was removed. The engine repeats the call
    /// until it returns `false`.
    fn propagate(&self, state: &mut WaveState) -> bool;

    /// Reset the wave and apply model-specific hard constraints
    fn clear(&self, state: &mut WaveState) {
        state.reset();
    }

    /// Convert the wave to pixels
    ///
    /// `Outcome::Success` renders collapsed cells at full color; anything else
    /// renders a blend of the remaining candidates.
    fn render(&self, state: &WaveState, outcome: Outcome) -> PixelGrid;
}

/// Run `propagate` until it reports no further change
///
/// Terminates because every sweep that reports a change removed at least one
/// candidate bit, and bits are never restored.
pub fn propagate_to_fixed_point<M: Model + ?Sized>(model: &M, state: &mut WaveState) -> usize {
    let mut sweeps = 0;
    while model.propagate(state) {
        sweeps += 1;
    }
    sweeps
}
