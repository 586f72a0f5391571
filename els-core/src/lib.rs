//! Equidistant letter sequence (ELS) search over a weighted letter graph.
//!
//! Pipeline:
//! 1. [`analyzer`] strips a text down to alphabet letters and keeps a map
//!    back to original character positions
//! 2. [`search`] reads every Nth letter, forward and backward, over a range
//!    of skips
//! 3. [`scoring`] tags each match with structural and numeric coincidences
//!    drawn from the [`graph`] and a lexicon, and ranks them
//!
//! [`ElsEngine`] wires the three together.
//!
//! ```
//! use els_core::{ElsEngine, SearchRequest};
//!
//! let engine = ElsEngine::hebrew();
//! let output = engine.find("אבגאבג", &SearchRequest::new("אב").with_skip(1)).unwrap();
//! assert!(output.matches.iter().any(|m| m.positions.as_slice() == [0, 1]));
//! ```

pub mod analyzer;
pub mod engine;
pub mod graph;
pub mod scoring;
pub mod search;

pub use engine::{AnalysisOutput, ElsEngine, SearchOutput, SearchRequest};
pub use graph::LetterGraph;
