/// Fixed-size pattern sets backing each wave cell
pub mod bitset;
/// Generic collapse engine: observation, iteration and seeding
pub mod executor;
/// Capability trait implemented by the compatibility models
pub mod model;
/// Overlapping N×N pattern model
pub mod overlapping;
/// Tiled model with symmetry classes and declared adjacencies
pub mod tiled;
