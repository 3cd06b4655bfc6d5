//! Tiled model
//!
//! Cells hold whole tiles. Compatibility comes from declared horizontal
//! adjacencies expanded through each tile's symmetry class into four directional
//! tables.

use ndarray::Array3;

use crate::{
    algorithm::model::{Model, Outcome},
    io::configuration::{DEFAULT_TILED_OUTPUT_SIZE, NEUTRAL_GRAY},
    io::error::{Result, invalid_parameter, invalid_tileset},
    spatial::WaveState,
    spatial::pixels::{ColorAccumulator, PixelGrid},
    spatial::tiles::{ActionTable, TileBlock, TileSet},
};

/// Parameters of the tiled model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TiledConfig {
    /// Output width in tiles
    pub width: usize,
    /// Output height in tiles
    pub height: usize,
    /// Whether the output wraps around its edges
    pub periodic: bool,
}

impl Default for TiledConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_TILED_OUTPUT_SIZE,
            height: DEFAULT_TILED_OUTPUT_SIZE,
            periodic: false,
        }
    }
}

/// Axis direction from a cell to its neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Neighbor at `x - 1`
    West,
    /// Neighbor at `y + 1`
    South,
    /// Neighbor at `x + 1`
    East,
    /// Neighbor at `y - 1`
    North,
}

impl Direction {
    /// All directions in propagator order
    pub const ALL: [Self; 4] = [Self::West, Self::South, Self::East, Self::North];

    /// Position in the propagator
    pub const fn index(self) -> usize {
        match self {
            Self::West => 0,
            Self::South => 1,
            Self::East => 2,
            Self::North => 3,
        }
    }

    /// Offset to the neighbor in this direction
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::West => (-1, 0),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::North => (0, -1),
        }
    }

    /// Direction pointing back
    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::North => Self::South,
        }
    }
}

/// Compatibility model over a catalog of symmetric tiles
#[derive(Debug, Clone)]
pub struct TiledModel {
    width: usize,
    height: usize,
    periodic: bool,
    tile_size: usize,
    names: Vec<String>,
    tiles: Vec<TileBlock>,
    stationary: Vec<f64>,
    /// `[direction, a, b]`: tile `b` may sit on the `direction` side of tile `a`
    propagator: Array3<bool>,
}

impl TiledModel {
    /// Build the model from a tile catalog
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output or tile size is zero
    /// - The catalog is empty, names a tile twice or has a bad weight
    /// - A tile's variants do not match its symmetry class or tile size
    /// - An adjacency names an unknown tile or a transform outside `0..8`
    pub fn new(tileset: &TileSet, config: &TiledConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{}x{}", config.width, config.height),
                &"output must be at least one tile in each direction",
            ));
        }
        if tileset.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tileset.tile_size,
                &"tiles must be at least one pixel wide",
            ));
        }
        if tileset.tiles.is_empty() {
            return Err(invalid_tileset(&"catalog declares no tiles"));
        }

        let action = ActionTable::build(&tileset.tiles)?;
        let mut names = Vec::with_capacity(action.len());
        let mut tiles = Vec::with_capacity(action.len());
        let mut stationary = Vec::with_capacity(action.len());

        for tile in &tileset.tiles {
            let weight = tile.effective_weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid_tileset(&format!(
                    "tile '{}' has invalid weight {}",
                    tile.name, tile.weight
                )));
            }
            for (orientation, block) in tile
                .orientation_blocks(tileset.tile_size)?
                .into_iter()
                .enumerate()
            {
                names.push(format!("{} {orientation}", tile.name));
                tiles.push(block);
                stationary.push(weight);
            }
        }

        let propagator = build_propagator(tileset, &action)?;

        Ok(Self {
            width: config.width,
            height: config.height,
            periodic: config.periodic,
            tile_size: tileset.tile_size,
            names,
            tiles,
            stationary,
            propagator,
        })
    }

    /// Number of tile variants
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Side length of every tile in pixels
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Variant names as `"<tile> <orientation>"`
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether variant `b` may sit on the `direction` side of variant `a`
    pub fn compatible(&self, direction: Direction, a: usize, b: usize) -> bool {
        self.propagator
            .get([direction.index(), a, b])
            .copied()
            .unwrap_or(false)
    }

    fn neighbor(&self, x: usize, y: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.delta();
        let nx = WaveState::resolve_axis(x as isize + dx, self.width, self.periodic)?;
        let ny = WaveState::resolve_axis(y as isize + dy, self.height, self.periodic)?;
        Some((nx, ny))
    }

    fn stamp(&self, output: &mut PixelGrid, x: usize, y: usize, tile: usize) {
        let Some(block) = self.tiles.get(tile) else {
            return;
        };
        let size = self.tile_size;
        for (offset, &color) in block.iter().enumerate() {
            output.set(x * size + offset % size, y * size + offset / size, color);
        }
    }

    fn render_complete(&self, state: &WaveState) -> PixelGrid {
        let size = self.tile_size;
        let mut output = PixelGrid::new(self.width * size, self.height * size);
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(tile) = state.cell(x, y).and_then(|set| set.single()) {
                    self.stamp(&mut output, x, y, tile);
                }
            }
        }
        output
    }

    fn render_incomplete(&self, state: &WaveState) -> PixelGrid {
        let size = self.tile_size;
        let total = self.tiles.len();
        let mut output = PixelGrid::new(self.width * size, self.height * size);

        for y in 0..self.height {
            for x in 0..self.width {
                let Some(set) = state.cell(x, y) else {
                    continue;
                };
                let remaining = set.count();
                if remaining == 0 || remaining == total {
                    continue;
                }

                for offset in 0..size * size {
                    let mut accumulator = ColorAccumulator::default();
                    for tile in set.iter() {
                        let color = self
                            .tiles
                            .get(tile)
                            .and_then(|block| block.get(offset))
                            .copied()
                            .unwrap_or(NEUTRAL_GRAY);
                        let weight = self.stationary.get(tile).copied().unwrap_or(0.0);
                        accumulator.add(color, weight);
                    }
                    output.set(
                        x * size + offset % size,
                        y * size + offset / size,
                        accumulator.average_or(NEUTRAL_GRAY),
                    );
                }
            }
        }

        output
    }
}

/// Directional compatibility tables from the declared adjacencies
///
/// West and South are filled from the declarations and their 180° and mirror
/// images; East and North are their transposes.
fn build_propagator(tileset: &TileSet, action: &ActionTable) -> Result<Array3<bool>> {
    let count = action.len();
    let mut propagator = Array3::from_elem((Direction::ALL.len(), count, count), false);
    let at = |variant: usize, transform: usize| action.get(variant, transform).unwrap_or(variant);

    let mut allow = |direction: Direction, a: usize, b: usize| {
        if let Some(slot) = propagator.get_mut([direction.index(), a, b]) {
            *slot = true;
        }
    };

    for rule in &tileset.neighbors {
        let left = action.resolve(&rule.left, rule.left_transform)?;
        let right = action.resolve(&rule.right, rule.right_transform)?;
        let down = at(left, 1);
        let up = at(right, 1);

        allow(Direction::West, right, left);
        allow(Direction::West, at(right, 6), at(left, 6));
        allow(Direction::West, at(left, 4), at(right, 4));
        allow(Direction::West, at(left, 2), at(right, 2));

        allow(Direction::South, up, down);
        allow(Direction::South, at(down, 6), at(up, 6));
        allow(Direction::South, at(up, 4), at(down, 4));
        allow(Direction::South, at(down, 2), at(up, 2));
    }

    for a in 0..count {
        for b in 0..count {
            for direction in [Direction::West, Direction::South] {
                let declared = propagator
                    .get([direction.index(), b, a])
                    .copied()
                    .unwrap_or(false);
                if let Some(slot) = propagator.get_mut([direction.opposite().index(), a, b]) {
                    *slot = declared;
                }
            }
        }
    }

    Ok(propagator)
}

impl Model for TiledModel {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn stationary(&self) -> &[f64] {
        &self.stationary
    }

    fn on_boundary(&self, _x: usize, _y: usize) -> bool {
        false
    }

    fn propagate(&self, state: &mut WaveState) -> bool {
        // Flags raised before this sweep; flags raised during it stay set for the next
        let dirty = state.changes.clone();
        state.changes.fill(false);
        let mut change = false;

        for direction in Direction::ALL {
            for x in 0..self.width {
                for y in 0..self.height {
                    let Some((nx, ny)) = self.neighbor(x, y, direction) else {
                        continue;
                    };
                    let neighbor_dirty =
                        dirty.get([nx, ny]).copied().unwrap_or(false) || state.is_changed(nx, ny);
                    if !neighbor_dirty {
                        continue;
                    }

                    let Some(support) = state.cell(nx, ny).cloned() else {
                        continue;
                    };
                    let candidates = state.cell(x, y).map(|set| set.to_vec());
                    for tile in candidates.unwrap_or_default() {
                        let supported = support
                            .iter()
                            .any(|other| self.compatible(direction, tile, other));
                        if !supported {
                            state.ban(x, y, tile);
                            change = true;
                        }
                    }
                }
            }
        }

        change
    }

    fn render(&self, state: &WaveState, outcome: Outcome) -> PixelGrid {
        match outcome {
            Outcome::Success => self.render_complete(state),
            Outcome::Incomplete | Outcome::Contradiction => self.render_incomplete(state),
        }
    }
}
