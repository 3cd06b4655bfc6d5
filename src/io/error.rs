//! Error types for model construction and file handling
//!
//! Generation outcomes are not errors: a contradiction or an exhausted
//! iteration budget is reported through [`crate::Outcome`].

use std::fmt;
use std::path::PathBuf;

/// Main error type for all fallible operations
#[derive(Debug)]
pub enum WfcError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Tile catalog document is not valid JSON for the expected schema
    TilesetParse {
        /// Path of the catalog document
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Sample data doesn't meet model requirements
    ///
    /// Occurs when:
    /// - The sample is empty
    /// - The sample is smaller than the pattern size without periodic input
    /// - The pattern space is too large to index
    InvalidSourceData {
        /// Description of what's wrong with the sample
        reason: String,
    },

    /// Model parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tile catalog is malformed
    InvalidTileset {
        /// Description of the malformation
        reason: String,
    },

    /// An adjacency rule names a tile that was never declared
    UnknownTile {
        /// The undeclared tile name
        name: String,
    },

    /// Every generation attempt ended in a contradiction
    GenerationFailed {
        /// Number of attempts made
        attempts: usize,
    },
}

impl fmt::Display for WfcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::TilesetParse { path, source } => {
                write!(f, "Failed to parse tileset '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTileset { reason } => {
                write!(f, "Invalid tileset: {reason}")
            }
            Self::UnknownTile { name } => {
                write!(f, "Adjacency rule references unknown tile '{name}'")
            }
            Self::GenerationFailed { attempts } => {
                write!(
                    f,
                    "Generation reached a contradiction in all {attempts} attempt(s)"
                )
            }
        }
    }
}

impl std::error::Error for WfcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::TilesetParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for fallible results
pub type Result<T> = std::result::Result<T, WfcError>;

impl From<std::io::Error> for WfcError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WfcError {
    WfcError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid tileset error
pub fn invalid_tileset(reason: &impl ToString) -> WfcError {
    WfcError::InvalidTileset {
        reason: reason.to_string(),
    }
}
