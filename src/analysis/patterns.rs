//! Pattern extraction from sample images
//!
//! Quantizes a sample to a dense palette, slides an N×N window over it,
//! expands each window into its dihedral variants and deduplicates the result
//! with a frequency count. Transforms are pure functions of the pattern and
//! its side length.

use ndarray::Array2;
use std::collections::HashMap;

use crate::io::configuration::DIHEDRAL_COUNT;
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::spatial::pixels::{PixelSource, Rgba};

/// Flattened N×N block of palette indices, stored as `x + y * n`
pub type Pattern = Vec<usize>;

/// Sample converted to palette indices
#[derive(Debug, Clone)]
pub struct IndexedSample {
    // Indexed [x, y]
    data: Array2<usize>,
    palette: Vec<Rgba>,
}

impl IndexedSample {
    /// Quantize a pixel source into palette indices
    ///
    /// Colors are numbered in first-seen order scanning rows top to bottom.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has no pixels
    pub fn from_source<S: PixelSource + ?Sized>(source: &S) -> Result<Self> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(WfcError::InvalidSourceData {
                reason: format!("sample is empty ({width}x{height})"),
            });
        }

        let mut palette = Vec::new();
        let mut lookup: HashMap<Rgba, usize> = HashMap::new();
        let mut data = Array2::zeros((width, height));

        for y in 0..height {
            for x in 0..width {
                let color = source.pixel(x, y);
                let index = *lookup.entry(color).or_insert_with(|| {
                    palette.push(color);
                    palette.len() - 1
                });
                if let Some(cell) = data.get_mut([x, y]) {
                    *cell = index;
                }
            }
        }

        Ok(Self { data, palette })
    }

    /// Sample width in pixels
    pub fn width(&self) -> usize {
        self.data.nrows()
    }

    /// Sample height in pixels
    pub fn height(&self) -> usize {
        self.data.ncols()
    }

    /// Distinct colors in first-seen order
    pub fn palette(&self) -> &[Rgba] {
        &self.palette
    }

    /// Palette index at a coordinate, wrapping around both axes
    pub fn index_at(&self, x: usize, y: usize) -> usize {
        self.data
            .get([x % self.width(), y % self.height()])
            .copied()
            .unwrap_or(0)
    }

    /// Extract the N×N pattern whose top-left corner is at `(x, y)`
    pub fn pattern_at(&self, x: usize, y: usize, n: usize) -> Pattern {
        build_pattern(n, |dx, dy| self.index_at(x + dx, y + dy))
    }
}

fn build_pattern(n: usize, mut cell: impl FnMut(usize, usize) -> usize) -> Pattern {
    let mut result = vec![0; n * n];
    for y in 0..n {
        for x in 0..n {
            if let Some(slot) = result.get_mut(x + y * n) {
                *slot = cell(x, y);
            }
        }
    }
    result
}

/// Rotate a pattern by 90 degrees
pub fn rotate(pattern: &[usize], n: usize) -> Pattern {
    build_pattern(n, |x, y| {
        pattern.get(n - 1 - y + x * n).copied().unwrap_or(0)
    })
}

/// Mirror a pattern left to right
pub fn reflect(pattern: &[usize], n: usize) -> Pattern {
    build_pattern(n, |x, y| {
        pattern.get(n - 1 - x + y * n).copied().unwrap_or(0)
    })
}

/// The eight dihedral variants of a pattern in canonical order
///
/// identity, reflect, rotate, reflect∘rotate, rotate², reflect∘rotate²,
/// rotate³, reflect∘rotate³
pub fn dihedral_variants(pattern: &[usize], n: usize) -> [Pattern; DIHEDRAL_COUNT] {
    let identity = pattern.to_vec();
    let reflected = reflect(&identity, n);
    let rotated = rotate(&identity, n);
    let rotated_reflected = reflect(&rotated, n);
    let rotated2 = rotate(&rotated, n);
    let rotated2_reflected = reflect(&rotated2, n);
    let rotated3 = rotate(&rotated2, n);
    let rotated3_reflected = reflect(&rotated3, n);

    [
        identity,
        reflected,
        rotated,
        rotated_reflected,
        rotated2,
        rotated2_reflected,
        rotated3,
        rotated3_reflected,
    ]
}

/// Size of the pattern index space, `colors^(n²)`, if it fits in `u128`
pub fn pattern_space(colors: usize, n: usize) -> Option<u128> {
    let exponent = u32::try_from(n * n).ok()?;
    (colors as u128).checked_pow(exponent)
}

/// Injective mixed-radix index of a pattern over `colors` digits
///
/// The first cell is the most significant digit. Callers check the space
/// with [`pattern_space`] first.
pub fn encode(pattern: &[usize], colors: usize) -> u128 {
    let radix = colors.max(1) as u128;
    pattern
        .iter()
        .fold(0u128, |acc, &digit| acc * radix + digit as u128)
}

/// Inverse of [`encode`] for an N×N pattern
pub fn decode(index: u128, n: usize, colors: usize) -> Pattern {
    let radix = colors.max(1) as u128;
    let mut residue = index;
    let mut result = vec![0; n * n];
    for slot in result.iter_mut().rev() {
        *slot = (residue % radix) as usize;
        residue /= radix;
    }
    result
}

/// Whether `second` placed at `(dx, dy)` agrees with `first` at the origin
///
/// Compares palette indices over the overlap of the two N×N windows.
pub fn agrees(first: &[usize], second: &[usize], dx: isize, dy: isize, n: usize) -> bool {
    let size = n as isize;
    let (x_min, x_max) = if dx < 0 { (0, dx + size) } else { (dx, size) };
    let (y_min, y_max) = if dy < 0 { (0, dy + size) } else { (dy, size) };

    for y in y_min..y_max {
        for x in x_min..x_max {
            let a = first.get((x + size * y) as usize);
            let b = second.get((x - dx + size * (y - dy)) as usize);
            if a != b {
                return false;
            }
        }
    }

    true
}

/// Deduplicated patterns with their occurrence counts
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    /// Pattern side length
    pub pattern_size: usize,
    /// Distinct patterns in first-seen order
    pub patterns: Vec<Pattern>,
    /// Occurrences of each pattern over positions and kept variants
    pub weights: Vec<f64>,
    /// Pattern found at the left end of the last sample row, when requested
    pub ground: Option<usize>,
    /// Sample palette the pattern cells index into
    pub palette: Vec<Rgba>,
}

impl PatternCatalog {
    /// Extract and count the patterns of a sample
    ///
    /// Window positions wrap around the sample when `periodic_input` is set and
    /// stop `n - 1` short of the right and bottom edges otherwise. The first
    /// `symmetry` dihedral variants of each window are counted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `n` is zero or `symmetry` is outside `1..=8`
    /// - The sample is smaller than `n` without periodic input
    /// - The pattern space does not fit the index type
    pub fn extract(
        sample: &IndexedSample,
        n: usize,
        periodic_input: bool,
        symmetry: usize,
        ground: bool,
    ) -> Result<Self> {
        if n == 0 {
            return Err(invalid_parameter("pattern_size", &n, &"must be at least 1"));
        }
        if !(1..=DIHEDRAL_COUNT).contains(&symmetry) {
            return Err(invalid_parameter(
                "symmetry",
                &symmetry,
                &"must be between 1 and 8",
            ));
        }

        let (width, height) = (sample.width(), sample.height());
        if !periodic_input && (width < n || height < n) {
            return Err(WfcError::InvalidSourceData {
                reason: format!("sample {width}x{height} is smaller than pattern size {n}"),
            });
        }

        let colors = sample.palette().len();
        if pattern_space(colors, n).is_none() {
            return Err(WfcError::InvalidSourceData {
                reason: format!("{colors} colors with pattern size {n} cannot be indexed"),
            });
        }

        let (horizontal_bound, vertical_bound) = if periodic_input {
            (width, height)
        } else {
            (width - n + 1, height - n + 1)
        };

        let mut ordinals: HashMap<u128, usize> = HashMap::new();
        let mut keys: Vec<u128> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut ground_pattern = None;

        for y in 0..vertical_bound {
            for x in 0..horizontal_bound {
                let variants = dihedral_variants(&sample.pattern_at(x, y, n), n);
                for (k, variant) in variants.iter().take(symmetry).enumerate() {
                    let key = encode(variant, colors);
                    let ordinal = *ordinals.entry(key).or_insert_with(|| {
                        keys.push(key);
                        counts.push(0);
                        keys.len() - 1
                    });
                    if let Some(count) = counts.get_mut(ordinal) {
                        *count += 1;
                    }
                    if ground && y == vertical_bound - 1 && x == 0 && k == 0 {
                        ground_pattern = Some(ordinal);
                    }
                }
            }
        }

        Ok(Self {
            pattern_size: n,
            patterns: keys.iter().map(|&key| decode(key, n, colors)).collect(),
            weights: counts.iter().map(|&count| count as f64).collect(),
            ground: ground_pattern,
            palette: sample.palette().to_vec(),
        })
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no pattern was extracted
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
