//! JSON tile catalog loading
//!
//! A catalog document names its tiles and adjacency rules; tile images live in a
//! directory relative to the document. Parsing and image decoding happen here so
//! the tiled model only ever sees an in-memory [`TileSet`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::io::configuration::DEFAULT_TILE_SIZE;
use crate::io::error::{Result, WfcError, invalid_tileset};
use crate::io::image::load_sample;
use crate::spatial::pixels::PixelSource;
use crate::spatial::tiles::{Adjacency, Symmetry, TileBlock, TileSet};

const fn default_tile_size() -> usize {
    DEFAULT_TILE_SIZE
}

/// Catalog document as stored on disk
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetDocument {
    /// Directory holding the tile images, relative to the document
    #[serde(default)]
    pub path: String,
    /// Whether every orientation has its own numbered image
    #[serde(default)]
    pub unique: bool,
    /// Side length of every tile image in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: usize,
    /// Declared tiles
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
    /// Declared horizontal adjacencies
    #[serde(default)]
    pub neighbors: Vec<NeighborEntry>,
}

/// One tile declaration
#[derive(Clone, Debug, Deserialize)]
pub struct TileEntry {
    /// Tile name, also the image file stem
    pub name: String,
    /// Symmetry class tag
    #[serde(default)]
    pub symmetry: String,
    /// Relative weight; zero or absent means the default weight
    #[serde(default)]
    pub weight: f64,
}

/// One adjacency declaration: `left` sits directly left of `right`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborEntry {
    /// Left tile name
    pub left: String,
    /// Transform index applied to the left tile
    #[serde(default)]
    pub left_num: usize,
    /// Right tile name
    pub right: String,
    /// Transform index applied to the right tile
    #[serde(default)]
    pub right_num: usize,
}

impl TilesetDocument {
    /// Parse a catalog document from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid catalog document
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| WfcError::TilesetParse {
            path: origin.to_path_buf(),
            source: e,
        })
    }

    /// Directory the tile images are read from
    pub fn image_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.path)
    }

    /// Load every tile image and build the in-memory catalog
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A symmetry tag is unknown
    /// - A tile image is missing, undecodable or not `tileSize` square
    pub fn into_tileset(self, base_dir: &Path) -> Result<TileSet> {
        let dir = self.image_dir(base_dir);
        let mut tileset = TileSet::new(self.tile_size);

        for entry in &self.tiles {
            let symmetry: Symmetry = entry.symmetry.parse()?;
            let variants = if self.unique {
                load_numbered_blocks(&dir, &entry.name, self.tile_size)?
            } else {
                let path = dir.join(format!("{}.png", entry.name));
                vec![load_block(&path, self.tile_size)?]
            };
            tileset = tileset.with_tile(&entry.name, symmetry, entry.weight, variants);
        }

        for rule in self.neighbors {
            tileset = tileset.with_adjacency(Adjacency::new(
                &rule.left,
                rule.left_num,
                &rule.right,
                rule.right_num,
            ));
        }

        Ok(tileset)
    }
}

/// Read and parse a catalog document, then load its tile images
///
/// Images resolve against the document's own directory.
///
/// # Errors
///
/// Returns an error if the document cannot be read or parsed, or if any tile
/// image fails to load
pub fn load_tileset(path: &Path) -> Result<TileSet> {
    let text = std::fs::read_to_string(path).map_err(|e| WfcError::FileSystem {
        path: path.to_path_buf(),
        operation: "read tileset",
        source: e,
    })?;
    let document = TilesetDocument::from_json(&text, path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    document.into_tileset(base_dir)
}

/// Load one square tile image as a pixel block
///
/// # Errors
///
/// Returns an error if the image cannot be loaded or is not `size` square
pub fn load_block(path: &Path, size: usize) -> Result<TileBlock> {
    let img = load_sample(path)?;
    let (width, height) = (PixelSource::width(&img), PixelSource::height(&img));
    if width != size || height != size {
        return Err(invalid_tileset(&format!(
            "'{}' is {width}x{height}, expected {size}x{size}",
            path.display()
        )));
    }

    let mut block = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            block.push(PixelSource::pixel(&img, x, y));
        }
    }
    Ok(block)
}

// "<name> 1.png", "<name> 2.png", ... up to the first missing index
fn load_numbered_blocks(dir: &Path, name: &str, size: usize) -> Result<Vec<TileBlock>> {
    let mut blocks = Vec::new();
    for index in 1.. {
        let path = dir.join(format!("{name} {index}.png"));
        if !path.exists() {
            break;
        }
        blocks.push(load_block(&path, size)?);
    }

    if blocks.is_empty() {
        return Err(invalid_tileset(&format!(
            "no images found for tile '{name}' in '{}'",
            dir.display()
        )));
    }
    Ok(blocks)
}
