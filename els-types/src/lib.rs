//! Core types shared by the ELS search engine.
//!
//! This crate holds the plain data that crosses crate boundaries: the letter
//! table rows, matches, significance reports, configuration and the error
//! taxonomy. Keeping them separate means:
//!
//! - **Clean boundaries**: the presentation layer can depend on the types
//!   without pulling in the search machinery
//! - **Serializable output**: every report can be handed to a renderer as-is
//! - **One error type**: every fallible operation in the workspace returns [`ElsError`]

#![warn(missing_docs)]

use core::cmp::Ordering;
use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Character index into a text (not a byte offset).
pub type Position = usize;

/// Inline storage for the positions of one match.
///
/// Most keywords are short, so eight slots avoid a heap allocation per hit.
pub type Positions = SmallVec<[Position; 8]>;

/// One row of the letter table: a symbol, its numeric value and its spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterSymbol {
    /// The letter itself.
    pub symbol: char,
    /// Standalone numeric value (gematria).
    pub weight: u32,
    /// Letters this letter decomposes into. May contain `symbol` itself.
    pub decomposition: Vec<char>,
}

impl LetterSymbol {
    /// Creates a symbol from a weight and a decomposition string.
    pub fn new(symbol: char, weight: u32, decomposition: &str) -> Self {
        Self {
            symbol,
            weight,
            decomposition: decomposition.chars().collect(),
        }
    }

    /// Returns `true` if the decomposition refers back to the symbol itself.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.decomposition.contains(&self.symbol)
    }
}

/// Reading direction of an equidistant letter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increasing text positions.
    Forward,
    /// Decreasing text positions.
    Backward,
}

impl Direction {
    /// Both directions, forward first.
    pub const BOTH: [Direction; 2] = [Direction::Forward, Direction::Backward];

    /// Returns the string used in logs and CLI output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ELS occurrence of a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// The normalized keyword that was found.
    pub keyword: String,
    /// Stride between consecutive letters. Never zero.
    pub skip: usize,
    /// Reading direction.
    pub direction: Direction,
    /// Original-text character indices, in reading order.
    pub positions: Positions,
}

impl Match {
    /// Position of the first letter read.
    #[inline]
    pub fn first_position(&self) -> Position {
        self.positions.first().copied().unwrap_or(0)
    }

    /// Number of letters in the match.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the match carries no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Deterministic ordering: skip, then first position, then direction.
    pub fn order_key(&self) -> (usize, Position, Direction) {
        (self.skip, self.first_position(), self.direction)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} skip={} {} at {:?}",
            self.keyword,
            self.skip,
            self.direction,
            self.positions.as_slice()
        )
    }
}

/// Why a match was considered significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The skip equals the keyword's path weight.
    SkipEqualsKeywordWeight,
    /// The matched letters weigh the same as the keyword.
    MatchedWeightEqualsKeyword,
    /// Many matches share this skip.
    HighFrequencySkip,
    /// Another match under the same skip starts nearby.
    Clustered,
    /// Every matched letter belongs to one island.
    SingleIsland,
    /// A strict majority of the matched letters belongs to one island.
    MajorityIsland,
    /// The skip equals the combined weight of the dominant island.
    SkipEqualsIslandWeight,
    /// A matched letter is self-looping or sits on a cycle.
    LoopLetter,
    /// A matched letter is the graph hub.
    HubLetter,
    /// The matched letters (with up to two neighbours) form a lexicon entry.
    LexiconWord,
    /// The matched letters carry a known prefix or suffix.
    LexiconAffix,
}

impl Reason {
    /// Every reason, in tag order.
    pub const ALL: [Reason; 11] = [
        Reason::SkipEqualsKeywordWeight,
        Reason::MatchedWeightEqualsKeyword,
        Reason::HighFrequencySkip,
        Reason::Clustered,
        Reason::SingleIsland,
        Reason::MajorityIsland,
        Reason::SkipEqualsIslandWeight,
        Reason::LoopLetter,
        Reason::HubLetter,
        Reason::LexiconWord,
        Reason::LexiconAffix,
    ];

    /// Stable string tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Reason::SkipEqualsKeywordWeight => "skip_equals_keyword_weight",
            Reason::MatchedWeightEqualsKeyword => "matched_weight_equals_keyword",
            Reason::HighFrequencySkip => "high_frequency_skip",
            Reason::Clustered => "clustered",
            Reason::SingleIsland => "single_island",
            Reason::MajorityIsland => "majority_island",
            Reason::SkipEqualsIslandWeight => "skip_equals_island_weight",
            Reason::LoopLetter => "loop_letter",
            Reason::HubLetter => "hub_letter",
            Reason::LexiconWord => "lexicon_word",
            Reason::LexiconAffix => "lexicon_affix",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A scored match.
///
/// Reports order by score (higher = greater), then by the match's skip,
/// first position and direction (lower = greater), so sorting in descending
/// order yields the ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceReport {
    /// The match being described.
    pub matched: Match,
    /// Distinct tags that fired.
    pub reasons: BTreeSet<Reason>,
    /// Sum of the configured weights of `reasons`.
    pub score: u32,
}

impl PartialOrd for SignificanceReport {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SignificanceReport {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.matched.order_key().cmp(&self.matched.order_key()))
            .then_with(|| other.matched.positions.cmp(&self.matched.positions))
    }
}

impl fmt::Display for SignificanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score={} {} [", self.score, self.matched)?;
        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(reason.tag())?;
        }
        f.write_str("]")
    }
}

/// Named classification of an island by its combined weight.
///
/// The groups are the classical division of the 22 letters: three mothers,
/// seven doubles and twelve simples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// א מ ש
    Mothers,
    /// ב ג ד כ פ ר ת
    Doubles,
    /// The twelve remaining letters.
    Simples,
    /// The whole alphabet.
    Complete,
}

/// Known island totals and the tier each one names.
pub const TIER_TABLE: [(u64, Tier); 4] = [
    (341, Tier::Mothers),
    (709, Tier::Doubles),
    (445, Tier::Simples),
    (1495, Tier::Complete),
];

impl Tier {
    /// Looks up a combined weight. Unknown totals yield `None`.
    pub fn from_weight(weight: u64) -> Option<Tier> {
        TIER_TABLE
            .iter()
            .find(|(total, _)| *total == weight)
            .map(|(_, tier)| *tier)
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Mothers => "mothers",
            Tier::Doubles => "doubles",
            Tier::Simples => "simples",
            Tier::Complete => "complete",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced by the engine.
///
/// None of these are fatal to the host; every one is recoverable at the
/// call boundary.
#[derive(Debug, thiserror::Error)]
pub enum ElsError {
    /// A skip of zero was requested.
    #[error("skip must be non-zero")]
    InvalidSkip,
    /// The keyword contains no alphabet letters.
    #[error("keyword contains no alphabet letters")]
    EmptyKeyword,
    /// A character outside the alphabet reached a weight computation.
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(char),
    /// The letter table lists a symbol twice.
    #[error("duplicate symbol '{0}' in letter table")]
    DuplicateSymbol(char),
    /// The letter table has more symbols than fit in a byte code.
    #[error("letter table has {count} symbols (max: {max})")]
    AlphabetTooLarge {
        /// Number of symbols supplied.
        count: usize,
        /// Largest supported alphabet.
        max: usize,
    },
    /// A normalized index has no original-text position.
    #[error("normalized index {index} out of range (len: {len})")]
    IndexMappingFault {
        /// The index that failed to resolve.
        index: usize,
        /// Length of the index map.
        len: usize,
    },
    /// The lexicon data could not be parsed.
    #[error("invalid lexicon: {0}")]
    Lexicon(String),
    /// Reading a resource failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Match budget applied by [`SweepConfig::bounded`].
pub const DEFAULT_MATCH_BUDGET: usize = 10_000;

/// Sweep configuration.
///
/// The default sweeps every skip with no budget. Budgets are opt-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Largest skip scanned. `None` means half the normalized text length.
    pub max_skip: Option<usize>,
    /// Directions scanned per skip.
    pub directions: Vec<Direction>,
    /// Stop once at least this many matches were collected.
    pub max_matches: Option<usize>,
    /// Stop once this many milliseconds have elapsed.
    pub time_budget_ms: Option<u64>,
    /// Scan skips on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_skip: None,
            directions: Direction::BOTH.to_vec(),
            max_matches: None,
            time_budget_ms: None,
            parallel: false,
        }
    }
}

impl SweepConfig {
    /// Full sweep with no budget at all.
    pub fn exhaustive() -> Self {
        Self::default()
    }

    /// Sweep capped at `max_skip` that also stops after
    /// [`DEFAULT_MATCH_BUDGET`] matches.
    pub fn bounded(max_skip: usize) -> Self {
        Self {
            max_skip: Some(max_skip),
            max_matches: Some(DEFAULT_MATCH_BUDGET),
            ..Self::default()
        }
    }

    /// Stops after `max_matches` matches; `0` removes the budget.
    pub fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = (max_matches > 0).then_some(max_matches);
        self
    }

    /// Restricts the sweep to a single direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.directions = vec![direction];
        self
    }
}

/// Significance scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Matches sharing a skip at or above this count are "high frequency".
    pub high_frequency_threshold: usize,
    /// Two matches under one skip closer than this are clustered.
    pub cluster_distance: usize,
    /// Letters of original-text context tried on each side for lexicon hits.
    pub lexicon_context: usize,
    /// Per-reason weight overrides. Reasons not listed weigh 1.
    pub weights: BTreeMap<Reason, u32>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_frequency_threshold: 3,
            cluster_distance: 50,
            lexicon_context: 2,
            weights: BTreeMap::new(),
        }
    }
}

impl ScoringConfig {
    /// Weight contributed by `reason`.
    #[inline]
    pub fn weight(&self, reason: Reason) -> u32 {
        self.weights.get(&reason).copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn sample_match(skip: usize, first: usize) -> Match {
        Match {
            keyword: "אב".to_string(),
            skip,
            direction: Direction::Forward,
            positions: smallvec![first, first + skip],
        }
    }

    #[test]
    fn report_ordering_prefers_score_then_small_skip() {
        let high = SignificanceReport {
            matched: sample_match(5, 0),
            reasons: [Reason::Clustered, Reason::HubLetter].into(),
            score: 2,
        };
        let low_skip = SignificanceReport {
            matched: sample_match(1, 10),
            reasons: [Reason::Clustered].into(),
            score: 1,
        };
        let high_skip = SignificanceReport {
            matched: sample_match(3, 0),
            reasons: [Reason::Clustered].into(),
            score: 1,
        };

        let mut reports = vec![high_skip.clone(), low_skip.clone(), high.clone()];
        reports.sort_by(|a, b| b.cmp(a));
        assert_eq!(reports, vec![high, low_skip, high_skip]);
    }

    #[test]
    fn report_ordering_breaks_ties_by_first_position() {
        let early = SignificanceReport {
            matched: sample_match(2, 1),
            reasons: [Reason::LoopLetter].into(),
            score: 1,
        };
        let late = SignificanceReport {
            matched: sample_match(2, 7),
            reasons: [Reason::LoopLetter].into(),
            score: 1,
        };
        assert!(early > late);
    }

    #[test]
    fn tier_lookup() {
        assert_eq!(Tier::from_weight(341), Some(Tier::Mothers));
        assert_eq!(Tier::from_weight(709), Some(Tier::Doubles));
        assert_eq!(Tier::from_weight(445), Some(Tier::Simples));
        assert_eq!(Tier::from_weight(1495), Some(Tier::Complete));
        assert_eq!(Tier::from_weight(7), None);
        let parts: u64 = TIER_TABLE
            .iter()
            .filter(|(_, tier)| *tier != Tier::Complete)
            .map(|(total, _)| total)
            .sum();
        assert_eq!(Tier::from_weight(parts), Some(Tier::Complete));
    }

    #[test]
    fn reason_tags_are_unique() {
        let tags: BTreeSet<&str> = Reason::ALL.iter().map(|r| r.tag()).collect();
        assert_eq!(tags.len(), Reason::ALL.len());
    }

    #[test]
    fn scoring_weights_default_to_one() {
        let mut config = ScoringConfig::default();
        assert_eq!(config.weight(Reason::Clustered), 1);
        config.weights.insert(Reason::Clustered, 4);
        assert_eq!(config.weight(Reason::Clustered), 4);
        assert_eq!(config.weight(Reason::HubLetter), 1);
    }

    #[test]
    fn sweep_config_from_partial_json() {
        let config: SweepConfig =
            serde_json::from_str(r#"{ "max_skip": 40, "directions": ["backward"] }"#).unwrap();
        assert_eq!(config.max_skip, Some(40));
        assert_eq!(config.directions, vec![Direction::Backward]);
        assert_eq!(config.max_matches, SweepConfig::default().max_matches);
    }

    #[test]
    fn sweep_budgets_are_opt_in() {
        assert_eq!(SweepConfig::default().max_matches, None);
        assert_eq!(SweepConfig::default().time_budget_ms, None);
        assert_eq!(SweepConfig::exhaustive(), SweepConfig::default());

        let bounded = SweepConfig::bounded(500);
        assert_eq!(bounded.max_skip, Some(500));
        assert_eq!(bounded.max_matches, Some(DEFAULT_MATCH_BUDGET));

        assert_eq!(SweepConfig::default().with_max_matches(25).max_matches, Some(25));
        assert_eq!(bounded.with_max_matches(0).max_matches, None);
    }

    #[test]
    fn scoring_config_weights_from_json() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "weights": { "lexicon_word": 3 } }"#).unwrap();
        assert_eq!(config.weight(Reason::LexiconWord), 3);
        assert_eq!(config.cluster_distance, 50);
    }

    #[test]
    fn self_loop_detection() {
        assert!(LetterSymbol::new('ו', 6, "ו").is_self_loop());
        assert!(!LetterSymbol::new('א', 1, "לפ").is_self_loop());
    }

    #[test]
    fn backward_match_starts_at_its_first_read_letter() {
        let m = Match {
            keyword: "אב".to_string(),
            skip: 3,
            direction: Direction::Backward,
            positions: smallvec![9, 6],
        };
        assert_eq!(m.first_position(), 9);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn error_display() {
        assert_eq!(ElsError::InvalidSkip.to_string(), "skip must be non-zero");
        assert_eq!(ElsError::UnknownSymbol('x').to_string(), "unknown symbol 'x'");
    }
}
