//! Algorithm constants and runtime configuration defaults

use crate::spatial::pixels::Rgba;

// Observation constants
/// Scale of the random noise added to cell entropy to break ties
pub const ENTROPY_NOISE: f64 = 1e-6;
/// Starting value for the minimum-entropy search; above any real entropy
pub const INITIAL_MIN_ENTROPY: f64 = 1000.0;

/// Color used where a pixel has no contributors or maximal uncertainty
pub const NEUTRAL_GRAY: Rgba = [127, 127, 127, 255];

// Default values for configurable parameters
/// Side length of overlapping patterns
pub const DEFAULT_PATTERN_SIZE: usize = 3;
/// Output width and height for the overlapping model, in cells
pub const DEFAULT_OUTPUT_SIZE: usize = 48;
/// Output width and height for the tiled model, in tiles
pub const DEFAULT_TILED_OUTPUT_SIZE: usize = 20;
/// Number of dihedral variants kept per sample position
pub const DEFAULT_SYMMETRY: usize = 8;
/// Side length of a tile when the catalog does not specify one
pub const DEFAULT_TILE_SIZE: usize = 16;
/// Weight given to tiles declared with zero or absent weight
pub const DEFAULT_TILE_WEIGHT: f64 = 1.0;
/// Number of generation attempts made by the command line tool
pub const DEFAULT_ATTEMPTS: usize = 1;

// Pattern-space limits
/// Largest pattern side length accepted by the overlapping model
pub const MAX_PATTERN_SIZE: usize = 8;
/// Number of dihedral transforms of a square
pub const DIHEDRAL_COUNT: usize = 8;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_wfc";
/// Iterations between captured visualization frames
pub const VISUALIZATION_INTERVAL: usize = 1;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 20;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
