/// Command line interface and generation runner
pub mod cli;
/// Algorithm constants and configuration defaults
pub mod configuration;
/// Error types and result aliases
pub mod error;
/// Sample loading and PNG export through the image crate
pub mod image;
/// Progress bars for long generations
pub mod progress;
/// JSON tile catalog loading
pub mod tileset;
/// Animated GIF capture of intermediate renders
pub mod visualization;
