//! Tile catalog, symmetry classes and transform tables
//!
//! A tile's symmetry class fixes how many distinct orientations it has and how
//! those orientations map onto each other under rotation and reflection. The
//! action table expands this into absolute variant indices for every tile.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::io::configuration::{DEFAULT_TILE_WEIGHT, DIHEDRAL_COUNT};
use crate::io::error::{Result, WfcError, invalid_tileset};
use crate::spatial::pixels::Rgba;

/// Square block of pixels stored as `x + y * size`
pub type TileBlock = Vec<Rgba>;

/// Symmetry class of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symmetry {
    /// Four orientations, reflection swaps within even/odd pairs
    L,
    /// Four orientations, reflection fixes even orientations
    T,
    /// Two orientations
    I,
    /// Two orientations, diagonal
    Backslash,
    /// Single orientation, also used when no class is given
    #[default]
    X,
}

impl Symmetry {
    /// Number of distinct orientations
    pub const fn cardinality(self) -> usize {
        match self {
            Self::L | Self::T => 4,
            Self::I | Self::Backslash => 2,
            Self::X => 1,
        }
    }

    /// Orientation reached by a quarter turn
    pub const fn rotate(self, orientation: usize) -> usize {
        match self {
            Self::L | Self::T => (orientation + 1) % 4,
            Self::I | Self::Backslash => 1 - orientation % 2,
            Self::X => orientation,
        }
    }

    /// Orientation reached by a mirror
    pub const fn reflect(self, orientation: usize) -> usize {
        match self {
            Self::L => {
                if orientation % 2 == 0 {
                    orientation + 1
                } else {
                    orientation - 1
                }
            }
            Self::T => {
                if orientation % 2 == 0 {
                    orientation
                } else {
                    4 - orientation
                }
            }
            Self::I | Self::Backslash => 1 - orientation % 2,
            Self::X => orientation,
        }
    }

    /// Transform row of one orientation, offset by the tile's first variant
    ///
    /// Entries follow `[identity, rot, rot², rot³, reflect, reflect∘rot,
    /// reflect∘rot², reflect∘rot³]`.
    pub const fn action_row(self, first: usize, orientation: usize) -> [usize; DIHEDRAL_COUNT] {
        let r1 = self.rotate(orientation);
        let r2 = self.rotate(r1);
        let r3 = self.rotate(r2);
        [
            first + orientation,
            first + r1,
            first + r2,
            first + r3,
            first + self.reflect(orientation),
            first + self.reflect(r1),
            first + self.reflect(r2),
            first + self.reflect(r3),
        ]
    }

    /// Tag used in catalog documents
    pub const fn tag(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::T => "T",
            Self::I => "I",
            Self::Backslash => "\\",
            Self::X => "X",
        }
    }
}

impl FromStr for Symmetry {
    type Err = WfcError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "L" => Ok(Self::L),
            "T" => Ok(Self::T),
            "I" => Ok(Self::I),
            "\\" => Ok(Self::Backslash),
            "X" | "" => Ok(Self::X),
            other => Err(invalid_tileset(&format!(
                "unknown symmetry class '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Rotate a pixel block by 90 degrees
pub fn rotate_block(block: &[Rgba], size: usize) -> TileBlock {
    let mut result = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            result.push(block.get(size - 1 - y + x * size).copied().unwrap_or_default());
        }
    }
    result
}

/// A named tile with its symmetry class, weight and pixel variants
#[derive(Debug, Clone, PartialEq)]
pub struct TileDefinition {
    /// Name referenced by adjacency rules
    pub name: String,
    /// Symmetry class
    pub symmetry: Symmetry,
    /// Relative weight; zero means the default weight
    pub weight: f64,
    /// Either one base block or one block per orientation
    pub variants: Vec<TileBlock>,
}

impl TileDefinition {
    /// Weight used by the model, replacing zero with the default weight
    pub fn effective_weight(&self) -> f64 {
        if self.weight == 0.0 {
            DEFAULT_TILE_WEIGHT
        } else {
            self.weight
        }
    }

    /// One block per orientation, rotating the base block when only one is given
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The variant count is neither one nor the symmetry cardinality
    /// - A block does not hold `size * size` pixels
    pub fn orientation_blocks(&self, size: usize) -> Result<Vec<TileBlock>> {
        let cardinality = self.symmetry.cardinality();

        if let Some(block) = self.variants.iter().find(|block| block.len() != size * size) {
            return Err(invalid_tileset(&format!(
                "tile '{}' has a block of {} pixels, expected {}",
                self.name,
                block.len(),
                size * size
            )));
        }

        if self.variants.len() == cardinality {
            return Ok(self.variants.clone());
        }

        match self.variants.as_slice() {
            [base] => {
                let mut blocks = vec![base.clone()];
                for _ in 1..cardinality {
                    let next = blocks
                        .last()
                        .map(|previous| rotate_block(previous, size))
                        .unwrap_or_default();
                    blocks.push(next);
                }
                Ok(blocks)
            }
            _ => Err(invalid_tileset(&format!(
                "tile '{}' has {} variants, expected 1 or {cardinality}",
                self.name,
                self.variants.len()
            ))),
        }
    }
}

/// Declared horizontal adjacency: `left` may sit directly left of `right`
///
/// Each index selects a transform `0..8` of the tile's first orientation, in
/// action-row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    /// Name of the left tile
    pub left: String,
    /// Transform applied to the left tile
    pub left_transform: usize,
    /// Name of the right tile
    pub right: String,
    /// Transform applied to the right tile
    pub right_transform: usize,
}

impl Adjacency {
    /// Rule between two tiles in their given transforms
    pub fn new(left: &str, left_transform: usize, right: &str, right_transform: usize) -> Self {
        Self {
            left: left.to_string(),
            left_transform,
            right: right.to_string(),
            right_transform,
        }
    }
}

/// In-memory tile catalog consumed by the tiled model
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    /// Side length of every tile block in pixels
    pub tile_size: usize,
    /// Declared tiles in order
    pub tiles: Vec<TileDefinition>,
    /// Declared adjacency rules
    pub neighbors: Vec<Adjacency>,
}

impl TileSet {
    /// Empty catalog for tiles of the given size
    pub const fn new(tile_size: usize) -> Self {
        Self {
            tile_size,
            tiles: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Append a tile
    #[must_use]
    pub fn with_tile(
        mut self,
        name: &str,
        symmetry: Symmetry,
        weight: f64,
        variants: Vec<TileBlock>,
    ) -> Self {
        self.tiles.push(TileDefinition {
            name: name.to_string(),
            symmetry,
            weight,
            variants,
        });
        self
    }

    /// Append an adjacency rule
    #[must_use]
    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.neighbors.push(adjacency);
        self
    }
}

/// Absolute variant indices of every transform of every tile orientation
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    rows: Vec<[usize; DIHEDRAL_COUNT]>,
    first: HashMap<String, usize>,
}

impl ActionTable {
    /// Build the table for a catalog in declaration order
    ///
    /// # Errors
    ///
    /// Returns an error if two tiles share a name
    pub fn build(tiles: &[TileDefinition]) -> Result<Self> {
        let mut table = Self::default();
        for tile in tiles {
            let first = table.rows.len();
            if table.first.insert(tile.name.clone(), first).is_some() {
                return Err(invalid_tileset(&format!(
                    "tile '{}' is declared more than once",
                    tile.name
                )));
            }
            for orientation in 0..tile.symmetry.cardinality() {
                table.rows.push(tile.symmetry.action_row(first, orientation));
            }
        }
        Ok(table)
    }

    /// Total number of tile variants
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no variants
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Variant reached by applying `transform` to `variant`
    pub fn get(&self, variant: usize, transform: usize) -> Option<usize> {
        self.rows.get(variant).and_then(|row| row.get(transform)).copied()
    }

    /// Index of a tile's first variant
    pub fn first_variant(&self, name: &str) -> Option<usize> {
        self.first.get(name).copied()
    }

    /// Variant selected by a named tile and transform index
    ///
    /// # Errors
    ///
    /// Returns an error if the tile is unknown or the transform is outside `0..8`
    pub fn resolve(&self, name: &str, transform: usize) -> Result<usize> {
        let first = self.first_variant(name).ok_or_else(|| WfcError::UnknownTile {
            name: name.to_string(),
        })?;
        self.get(first, transform).ok_or_else(|| {
            invalid_tileset(&format!(
                "transform {transform} of tile '{name}' is outside 0..{DIHEDRAL_COUNT}"
            ))
        })
    }
}
