//! Text analysis.
//!
//! This module provides the text processing components:
//! - **Alphabet**: Maps characters to dense letter codes (case folding, final forms)
//! - **Normalizer**: Strips non-letters and keeps a map back to original positions

pub mod alphabet;
pub mod normalizer;

pub use alphabet::Alphabet;
pub use normalizer::{NormalizedText, TextNormalizer};
