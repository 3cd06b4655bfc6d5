//! Mathematical utilities for the algorithm

/// Shannon entropy and weighted random selection
pub mod probability;
