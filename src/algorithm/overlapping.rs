//! Overlapping pattern model
//!
//! Every N×N window of the sample (and its dihedral variants) becomes a pattern.
//! Two patterns are compatible at an offset when they agree on their overlap.
//! Each output cell holds the top-left pixel of its pattern, so neighboring
//! cells within `N - 1` constrain each other.

use ndarray::Array3;

use crate::{
    algorithm::model::{Model, Outcome, propagate_to_fixed_point},
    analysis::patterns::{IndexedSample, Pattern, PatternCatalog, agrees},
    io::configuration::{
        DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SYMMETRY, DIHEDRAL_COUNT,
        MAX_PATTERN_SIZE, NEUTRAL_GRAY,
    },
    io::error::{Result, WfcError, invalid_parameter},
    spatial::pixels::{ColorAccumulator, PixelGrid, PixelSource, Rgba},
    spatial::WaveState,
};

/// Parameters of the overlapping model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlappingConfig {
    /// Side length N of the extracted patterns
    pub pattern_size: usize,
    /// Output width in cells
    pub width: usize,
    /// Output height in cells
    pub height: usize,
    /// Whether sample windows wrap around the sample edges
    pub periodic_input: bool,
    /// Whether the output tiles seamlessly
    pub periodic_output: bool,
    /// Number of dihedral variants kept per sample position (1 to 8)
    pub symmetry: usize,
    /// Pin the sample's bottom-left pattern along the output's bottom row
    pub ground: bool,
}

impl Default for OverlappingConfig {
    fn default() -> Self {
        Self {
            pattern_size: DEFAULT_PATTERN_SIZE,
            width: DEFAULT_OUTPUT_SIZE,
            height: DEFAULT_OUTPUT_SIZE,
            periodic_input: true,
            periodic_output: true,
            symmetry: DEFAULT_SYMMETRY,
            ground: false,
        }
    }
}

impl OverlappingConfig {
    /// Check parameters that do not depend on the sample
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output has a zero dimension
    /// - The pattern size is zero or above the supported maximum
    /// - The symmetry is outside `1..=8`
    /// - A non-periodic output is smaller than the pattern size
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{}x{}", self.width, self.height),
                &"output must be at least one cell in each direction",
            ));
        }
        if self.pattern_size == 0 || self.pattern_size > MAX_PATTERN_SIZE {
            return Err(invalid_parameter(
                "pattern_size",
                &self.pattern_size,
                &format!("must be between 1 and {MAX_PATTERN_SIZE}"),
            ));
        }
        if !(1..=DIHEDRAL_COUNT).contains(&self.symmetry) {
            return Err(invalid_parameter(
                "symmetry",
                &self.symmetry,
                &format!("must be between 1 and {DIHEDRAL_COUNT}"),
            ));
        }
        if !self.periodic_output
            && (self.width < self.pattern_size || self.height < self.pattern_size)
        {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{}x{}", self.width, self.height),
                &"non-periodic output must fit at least one pattern",
            ));
        }
        Ok(())
    }
}

/// Compatibility model built from the overlapping windows of a sample
#[derive(Debug, Clone)]
pub struct OverlappingModel {
    n: usize,
    width: usize,
    height: usize,
    periodic: bool,
    palette: Vec<Rgba>,
    patterns: Vec<Pattern>,
    stationary: Vec<f64>,
    ground: Option<usize>,
    /// Compatible patterns per `[pattern, dx + n - 1, dy + n - 1]`
    propagator: Array3<Vec<usize>>,
}

impl OverlappingModel {
    /// Build the model from a sample
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the sample cannot
    /// supply patterns of the requested size
    pub fn new<S: PixelSource + ?Sized>(sample: &S, config: &OverlappingConfig) -> Result<Self> {
        config.validate()?;
        let indexed = IndexedSample::from_source(sample)?;
        let catalog = PatternCatalog::extract(
            &indexed,
            config.pattern_size,
            config.periodic_input,
            config.symmetry,
            config.ground,
        )?;
        Self::assemble(catalog, config)
    }

    /// Build the model from already extracted patterns
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the catalog is empty or
    /// its pattern size differs from the configuration
    pub fn from_catalog(catalog: PatternCatalog, config: &OverlappingConfig) -> Result<Self> {
        config.validate()?;
        Self::assemble(catalog, config)
    }

    /// Build from a catalog once the configuration has been validated
    fn assemble(catalog: PatternCatalog, config: &OverlappingConfig) -> Result<Self> {
        if catalog.is_empty() {
            return Err(WfcError::InvalidSourceData {
                reason: "no patterns were extracted".to_string(),
            });
        }
        if catalog.pattern_size != config.pattern_size {
            return Err(invalid_parameter(
                "pattern_size",
                &catalog.pattern_size,
                &format!("catalog does not match configured size {}", config.pattern_size),
            ));
        }

        let n = config.pattern_size;
        let propagator = build_propagator(&catalog.patterns, n);

        Ok(Self {
            n,
            width: config.width,
            height: config.height,
            periodic: config.periodic_output,
            palette: catalog.palette,
            patterns: catalog.patterns,
            stationary: catalog.weights,
            ground: catalog.ground,
            propagator,
        })
    }

    /// Pattern side length
    pub const fn pattern_size(&self) -> usize {
        self.n
    }

    /// Number of distinct patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Distinct patterns as palette indices
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Sample palette
    pub fn palette(&self) -> &[Rgba] {
        &self.palette
    }

    /// Pattern pinned to the bottom row, if any
    pub const fn ground(&self) -> Option<usize> {
        self.ground
    }

    /// Patterns that agree with `pattern` when placed at offset `(dx, dy)`
    ///
    /// Offsets outside `[-(N-1), N-1]` have no compatible patterns.
    pub fn compatible(&self, pattern: usize, dx: isize, dy: isize) -> &[usize] {
        let reach = self.n as isize - 1;
        if dx.abs() > reach || dy.abs() > reach {
            return &[];
        }
        self.propagator
            .get([pattern, (dx + reach) as usize, (dy + reach) as usize])
            .map_or(&[], Vec::as_slice)
    }

    fn pattern_color(&self, pattern: usize, cell: usize) -> Rgba {
        self.patterns
            .get(pattern)
            .and_then(|p| p.get(cell))
            .and_then(|&index| self.palette.get(index))
            .copied()
            .unwrap_or(NEUTRAL_GRAY)
    }

    fn render_complete(&self, state: &WaveState) -> PixelGrid {
        let mut output = PixelGrid::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(pattern) = state.cell(x, y).and_then(|set| set.iter().next()) {
                    output.set(x, y, self.pattern_color(pattern, 0));
                }
            }
        }
        output
    }

    fn render_incomplete(&self, state: &WaveState) -> PixelGrid {
        let mut output = PixelGrid::new(self.width, self.height);
        let (x_limit, y_limit) = (
            self.width.saturating_sub(self.n),
            self.height.saturating_sub(self.n),
        );

        for y in 0..self.height {
            for x in 0..self.width {
                let mut accumulator = ColorAccumulator::default();

                for dy in 0..self.n {
                    for dx in 0..self.n {
                        // Only the upper bound is checked: wrapped-around origins
                        // land past the limit for non-periodic output.
                        let Some(sx) =
                            WaveState::resolve_axis(x as isize - dx as isize, self.width, true)
                        else {
                            continue;
                        };
                        let Some(sy) =
                            WaveState::resolve_axis(y as isize - dy as isize, self.height, true)
                        else {
                            continue;
                        };
                        if !self.periodic && (sx > x_limit || sy > y_limit) {
                            continue;
                        }

                        if let Some(set) = state.cell(sx, sy) {
                            for pattern in set.iter() {
                                accumulator.add(self.pattern_color(pattern, dx + dy * self.n), 1.0);
                            }
                        }
                    }
                }

                output.set(x, y, accumulator.average_or(NEUTRAL_GRAY));
            }
        }

        output
    }
}

/// Positional agreement table for every pattern pair and offset
fn build_propagator(patterns: &[Pattern], n: usize) -> Array3<Vec<usize>> {
    let span = 2 * n - 1;
    let reach = n as isize - 1;
    Array3::from_shape_fn((patterns.len(), span, span), |(t, ox, oy)| {
        let dx = ox as isize - reach;
        let dy = oy as isize - reach;
        patterns.get(t).map_or_else(Vec::new, |first| {
            patterns
                .iter()
                .enumerate()
                .filter(|(_, second)| agrees(first, second, dx, dy, n))
                .map(|(t2, _)| t2)
                .collect()
        })
    })
}

impl Model for OverlappingModel {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn stationary(&self) -> &[f64] {
        &self.stationary
    }

    fn on_boundary(&self, x: usize, y: usize) -> bool {
        !self.periodic && (x + self.n > self.width || y + self.n > self.height)
    }

    fn propagate(&self, state: &mut WaveState) -> bool {
        let mut change = false;
        let (width, height) = state.dimensions;
        let reach = self.n as isize - 1;

        for x in 0..width {
            for y in 0..height {
                if !state.is_changed(x, y) {
                    continue;
                }
                state.clear_changed(x, y);

                let Some(source) = state.cell(x, y).cloned() else {
                    continue;
                };

                for dx in -reach..=reach {
                    for dy in -reach..=reach {
                        let Some(sx) =
                            WaveState::resolve_axis(x as isize + dx, width, self.periodic)
                        else {
                            continue;
                        };
                        let Some(sy) =
                            WaveState::resolve_axis(y as isize + dy, height, self.periodic)
                        else {
                            continue;
                        };

                        let candidates = state.cell(sx, sy).map(|set| set.to_vec());
                        for pattern in candidates.unwrap_or_default() {
                            // Supported when some pattern left at the source sees
                            // this one at the inverse offset
                            if !source.contains_any(self.compatible(pattern, -dx, -dy)) {
                                state.ban(sx, sy, pattern);
                                change = true;
                            }
                        }
                    }
                }
            }
        }

        change
    }

    fn clear(&self, state: &mut WaveState) {
        state.reset();

        let Some(ground) = self.ground else {
            return;
        };
        if self.patterns.len() <= 1 {
            return;
        }

        let (width, height) = state.dimensions;
        let Some(bottom) = height.checked_sub(1) else {
            return;
        };

        for x in 0..width {
            for pattern in 0..self.patterns.len() {
                if pattern != ground {
                    state.ban(x, bottom, pattern);
                }
            }
            state.mark_changed(x, bottom);

            for y in 0..bottom {
                state.ban(x, y, ground);
                state.mark_changed(x, y);
            }
        }

        propagate_to_fixed_point(self, state);
    }

    fn render(&self, state: &WaveState, outcome: Outcome) -> PixelGrid {
        match outcome {
            Outcome::Success => self.render_complete(state),
            Outcome::Incomplete | Outcome::Contradiction => self.render_incomplete(state),
        }
    }
}
