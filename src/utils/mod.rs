//! String utilities for crop-name matching
//!
//! - Normalization: canonical form for free-text crop names
//! - Similarity: ratio-based approximate matching

pub mod normalization;
pub mod similarity;

// Re-export commonly used functions
pub use normalization::normalize_crop_name;
pub use similarity::{close_matches, similarity_ratio};
