//! Wave function collapse image synthesis
//!
//! A generic collapse engine (entropy-guided observation, weighted random resolution,
//! fixed-point propagation) driven by two compatibility models: overlapping N×N
//! patterns extracted from a sample image, and named tiles with declared adjacencies
//! and symmetry classes.

#![forbid(unsafe_code)]

/// Collapse engine, compatibility models and the per-cell pattern sets they share
pub mod algorithm;
/// Pattern extraction and preprocessing for sample images
pub mod analysis;
/// Input/output adapters, configuration and error handling
pub mod io;
/// Probability utilities for entropy and weighted draws
pub mod math;
/// Wave state, tile catalogs and pixel surfaces
pub mod spatial;

pub use algorithm::executor::Collapse;
pub use algorithm::model::{Model, Outcome};
pub use algorithm::overlapping::OverlappingModel;
pub use algorithm::tiled::TiledModel;
pub use io::error::{Result, WfcError};
