//! Equidistant letter sequence search.
//!
//! Two layers:
//! - [`SkipSequenceSearcher`] scans one skip in one direction over letter codes
//! - [`SweepOrchestrator`] repeats that over a range of skips and directions,
//!   translates hits to original-text positions and applies budgets
//!
//! Threading:
//! - A sweep is a pure function of its inputs. With `parallel` set, skips are
//!   scanned on the rayon pool in chunks; the merged result is the same as
//!   the sequential one unless a budget stops the sweep.

mod searcher;
mod sweep;

pub use searcher::{Hit, SkipSequenceSearcher};
pub use sweep::{matches_at, SweepOrchestrator, SweepOutcome, PARALLEL_CHUNK};
