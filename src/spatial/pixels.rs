//! Pixel surfaces exchanged with the models
//!
//! Models read samples through [`PixelSource`] and produce a [`PixelGrid`];
//! decoding and encoding image files happens elsewhere.

use ndarray::Array2;

use crate::io::configuration::NEUTRAL_GRAY;

/// RGBA color with 8 bits per channel
pub type Rgba = [u8; 4];

/// Read-only 2D color surface
pub trait PixelSource {
    /// Width in pixels
    fn width(&self) -> usize;

    /// Height in pixels
    fn height(&self) -> usize;

    /// Color at the given coordinate
    ///
    /// Callers stay within `0..width` and `0..height`.
    fn pixel(&self, x: usize, y: usize) -> Rgba;
}

/// Owned pixel surface produced by rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    // Stored row-major: (row, col) = (y, x)
    pixels: Array2<Rgba>,
}

impl PixelGrid {
    /// Create a grid filled with neutral gray
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, NEUTRAL_GRAY)
    }

    /// Create a grid filled with a single color
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), color),
        }
    }

    /// Build a grid from rows of colors
    ///
    /// Short rows are padded with neutral gray to the widest row.
    pub fn from_rows(rows: &[Vec<Rgba>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &color) in row.iter().enumerate() {
                grid.set(x, y, color);
            }
        }
        grid
    }

    /// Color at a coordinate, `None` when out of range
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        self.pixels.get([y, x]).copied()
    }

    /// Overwrite a pixel; out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if let Some(pixel) = self.pixels.get_mut([y, x]) {
            *pixel = color;
        }
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = Vec<Rgba>> + '_ {
        self.pixels.rows().into_iter().map(|row| row.to_vec())
    }
}

impl PixelSource for PixelGrid {
    fn width(&self) -> usize {
        self.pixels.ncols()
    }

    fn height(&self) -> usize {
        self.pixels.nrows()
    }

    fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.get(x, y).unwrap_or(NEUTRAL_GRAY)
    }
}

/// Channel-wise accumulator for averaging colors
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAccumulator {
    sums: [f64; 4],
    weight: f64,
}

impl ColorAccumulator {
    /// Add a color with the given weight
    pub fn add(&mut self, color: Rgba, weight: f64) {
        for (sum, &channel) in self.sums.iter_mut().zip(color.iter()) {
            *sum += f64::from(channel) * weight;
        }
        self.weight += weight;
    }

    /// Total weight accumulated so far
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Weighted mean color, or `fallback` when nothing contributed
    ///
    /// Channels are averaged in floating point and truncated, so a channel can
    /// land one step away from a 16-bit fixed-point blend of the same inputs.
    pub fn average_or(&self, fallback: Rgba) -> Rgba {
        if self.weight <= 0.0 {
            return fallback;
        }
        self.sums.map(|sum| (sum / self.weight).clamp(0.0, 255.0) as u8)
    }
}
