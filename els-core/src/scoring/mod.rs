//! Significance scoring for sweep results.
//!
//! Every match is checked against a fixed set of [`Reason`](els_types::Reason)s:
//! numeric coincidences with the keyword's weight, skip frequency and
//! clustering, graph structure (islands, loops, hub) and lexicon hits.
//! Each reason that fires adds its configured weight to the score.
//!
//! Matches with no reasons are dropped. The rest are ordered by score,
//! then skip, then first position, so the output is deterministic for a
//! given input.

mod lexicon;
mod scorer;

pub use lexicon::{CompiledLexicon, Lexicon};
pub use scorer::{ScoringModel, SignificanceScorer};
