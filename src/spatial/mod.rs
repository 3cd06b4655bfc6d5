//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Wave state owned by the collapse engine
//! - Tile catalogs with symmetry classes
//! - Pixel surfaces consumed and produced by the models

/// Wave, change flags and stationary weights
pub mod grid;
/// Pixel samplers and rendered pixel grids
pub mod pixels;
/// Tile catalog, symmetry classes and transform tables
pub mod tiles;

pub use grid::WaveState;
pub use pixels::{PixelGrid, PixelSource, Rgba};
