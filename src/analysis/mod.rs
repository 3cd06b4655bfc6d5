//! Analysis and preprocessing of sample images

/// Pattern extraction, transforms and frequency counting
pub mod patterns;
