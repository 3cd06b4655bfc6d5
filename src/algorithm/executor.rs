//! Entropy-guided observation loop shared by every compatibility model

use crate::{
    algorithm::model::{Model, Outcome, propagate_to_fixed_point},
    io::configuration::{ENTROPY_NOISE, INITIAL_MIN_ENTROPY},
    math::probability::{normalize, shannon_entropy, weighted_index},
    spatial::{PixelGrid, WaveState},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seeded random source for entropy tie-breaks and weighted draws
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[0, 1)`
    pub fn sample(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution, falling
    /// back to the last positively weighted index on floating error
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let sample = self.sample();
        weighted_index(weights, sample)
    }
}

/// Seed derived from the wall clock, used when no seed was installed
///
/// Runs using it are not reproducible.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

/// Wave function collapse engine generic over the compatibility model
///
/// Alternates observation of the lowest-entropy cell with propagation to a fixed
/// point until every cell collapses or a contradiction appears. Knows nothing
/// about what the patterns mean; the model supplies boundary tests,
/// propagation, hard constraints and rendering.
pub struct Collapse<M: Model> {
    /// Compatibility model supplying pattern semantics
    pub model: M,
    /// Wave, change flags and stationary weights
    pub state: WaveState,
    /// Observations performed since the last clear
    pub iteration: usize,
    random_selector: RandomSelector,
    seed: Option<u64>,
    active_seed: u64,
    outcome: Outcome,
    initialized: bool,
    /// Pre-allocated buffer to reduce allocations in hot path
    distribution: Vec<f64>,
}

impl<M: Model> Collapse<M> {
    /// Create an engine around a model
    ///
    /// The wave is allocated but not cleared; `clear`, `iterate` or `generate`
    /// prepare it before the first observation.
    pub fn new(model: M) -> Self {
        let (width, height) = model.dimensions();
        let stationary = model.stationary().to_vec();
        let pattern_count = stationary.len();
        let active_seed = time_seed();

        Self {
            state: WaveState::new(width, height, stationary),
            model,
            iteration: 0,
            random_selector: RandomSelector::new(active_seed),
            seed: None,
            active_seed,
            outcome: Outcome::Incomplete,
            initialized: false,
            distribution: vec![0.0; pattern_count],
        }
    }

    /// Create an engine with a fixed seed installed
    pub fn seeded(model: M, seed: u64) -> Self {
        let mut engine = Self::new(model);
        engine.set_seed(seed);
        engine
    }

    /// Install a deterministic random source
    ///
    /// Every subsequent `clear` rewinds the source to this seed, so each run
    /// started from a clear replays identically.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
        self.active_seed = seed;
        self.random_selector = RandomSelector::new(seed);
    }

    /// Seed driving the current run
    pub const fn active_seed(&self) -> u64 {
        self.active_seed
    }

    /// Outcome of the current run
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the wave has been cleared since construction
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reset the wave, apply the model's hard constraints and restart the run
    pub fn clear(&mut self) {
        self.active_seed = self.seed.unwrap_or_else(time_seed);
        self.random_selector = RandomSelector::new(self.active_seed);
        self.model.clear(&mut self.state);
        self.outcome = Outcome::Incomplete;
        self.iteration = 0;
        self.initialized = true;
    }

    /// Collapse the observable cell with minimum entropy
    ///
    /// Returns `true` when the run is finished: either a cell with no remaining
    /// weight was found (contradiction) or no cell has positive entropy left
    /// (success).
    pub fn observe_one(&mut self) -> bool {
        let (width, height) = self.state.dimensions;
        let mut distribution = std::mem::take(&mut self.distribution);

        let mut min_entropy = INITIAL_MIN_ENTROPY;
        let mut selected = None;

        for x in 0..width {
            for y in 0..height {
                if self.model.on_boundary(x, y) {
                    continue;
                }

                let sum = self.state.fill_distribution(x, y, &mut distribution);
                if sum <= 0.0 {
                    self.outcome = Outcome::Contradiction;
                    self.distribution = distribution;
                    return true;
                }

                normalize(&mut distribution);
                let entropy = shannon_entropy(&distribution);
                let noise = ENTROPY_NOISE * self.random_selector.sample();

                if entropy > 0.0 && entropy + noise < min_entropy {
                    min_entropy = entropy + noise;
                    selected = Some((x, y));
                }
            }
        }

        let Some((x, y)) = selected else {
            self.outcome = Outcome::Success;
            self.distribution = distribution;
            return true;
        };

        self.state.fill_distribution(x, y, &mut distribution);
        let pattern = self.random_selector.weighted_choice(&distribution);
        self.state.collapse(x, y, pattern);
        self.distribution = distribution;

        false
    }

    /// Observe one cell and propagate its consequences to a fixed point
    pub fn iterate_once(&mut self) -> bool {
        if self.observe_one() {
            return true;
        }

        propagate_to_fixed_point(&self.model, &mut self.state);
        self.iteration += 1;
        false
    }

    /// Run at most `iterations` observation steps
    ///
    /// Clears first when the wave has never been cleared. State persists across
    /// calls so an incomplete run can be resumed. Returns whether the run finished.
    pub fn iterate(&mut self, iterations: usize) -> bool {
        if !self.initialized {
            self.clear();
        }

        for _ in 0..iterations {
            if self.iterate_once() {
                return true;
            }
        }

        false
    }

    /// Clear and run until success or contradiction
    ///
    /// Has no iteration cap; use `iterate` when the caller needs a bound.
    pub fn generate(&mut self) -> Outcome {
        self.clear();
        while !self.iterate_once() {}
        self.outcome
    }

    /// Render the current wave through the model
    pub fn render(&self) -> PixelGrid {
        self.model.render(&self.state, self.outcome)
    }
}
