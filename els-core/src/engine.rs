//! Engine façade: text and keyword in, matches or ranked reports out.
//!
//! [`ElsEngine`] owns everything that is loaded once (graph, normalizer,
//! lexicon, scoring weights). Each call receives its own text and request
//! and keeps no state between calls; caching normalized corpora is up to
//! the caller.

use els_types::{Direction, ElsError, Match, ScoringConfig, SignificanceReport, SweepConfig};
use serde::{Deserialize, Serialize};

use crate::analyzer::{NormalizedText, TextNormalizer};
use crate::graph::LetterGraph;
use crate::scoring::{Lexicon, ScoringModel, SignificanceScorer};
use crate::search::{SweepOrchestrator, SweepOutcome};

/// One search over one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Word to look for. Normalized before searching.
    pub keyword: String,
    /// Scan only this direction. `None` keeps the sweep's directions.
    pub direction: Option<Direction>,
    /// Scan exactly this skip instead of sweeping.
    pub skip: Option<usize>,
    /// Scan exactly the skip given by this string's path weight.
    ///
    /// Ignored when `skip` is set.
    pub seed: Option<String>,
    /// Range and budgets for a full sweep.
    pub sweep: SweepConfig,
}

impl SearchRequest {
    /// Full sweep for `keyword` with the default configuration.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Restricts the search to one direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Scans a single skip.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Derives the single skip from `seed`.
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Replaces the sweep configuration.
    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }
}

/// Unscored result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutput {
    /// Matches ordered by skip, then scan order.
    pub matches: Vec<Match>,
    /// Skips scanned.
    pub skips_scanned: usize,
    /// A budget cut the sweep short.
    pub truncated: bool,
}

/// Scored result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisOutput {
    /// Reports, highest score first.
    pub reports: Vec<SignificanceReport>,
    /// Matches found before scoring, including those dropped for having no tags.
    pub match_count: usize,
    /// Skips scanned.
    pub skips_scanned: usize,
    /// A budget cut the sweep short.
    pub truncated: bool,
}

/// ELS search engine over one alphabet.
///
/// The scoring model (compiled lexicon, loop letters, hub) is built when the
/// engine is configured and shared by every [`analyze`](Self::analyze) call.
#[derive(Debug)]
pub struct ElsEngine {
    graph: LetterGraph,
    normalizer: TextNormalizer,
    lexicon: Lexicon,
    model: ScoringModel,
}

impl ElsEngine {
    /// Creates an engine over `graph` with an empty lexicon.
    pub fn new(graph: LetterGraph) -> Self {
        let normalizer = TextNormalizer::for_graph(&graph);
        let lexicon = Lexicon::default();
        let model = ScoringModel::new(&graph, &normalizer, &lexicon, ScoringConfig::default());
        Self {
            graph,
            normalizer,
            lexicon,
            model,
        }
    }

    /// The Hebrew alphabet with the bundled lexicon.
    pub fn hebrew() -> Self {
        Self::new(LetterGraph::hebrew()).with_lexicon(Lexicon::bundled())
    }

    /// Replaces the lexicon.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self.rebuild_model(self.model.config().clone());
        self
    }

    /// Replaces the scoring configuration.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.rebuild_model(scoring);
        self
    }

    fn rebuild_model(&mut self, scoring: ScoringConfig) {
        self.model = ScoringModel::new(&self.graph, &self.normalizer, &self.lexicon, scoring);
    }

    /// The letter graph.
    #[inline]
    pub fn graph(&self) -> &LetterGraph {
        &self.graph
    }

    /// The normalizer built from the graph.
    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// The active lexicon.
    #[inline]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// The active scoring configuration.
    #[inline]
    pub fn scoring(&self) -> &ScoringConfig {
        self.model.config()
    }

    /// Finds every match without scoring.
    ///
    /// # Errors
    ///
    /// `ElsError::InvalidSkip` if the request asks for skip zero, directly
    /// or through a seed that weighs nothing.
    pub fn find(&self, text: &str, request: &SearchRequest) -> Result<SearchOutput, ElsError> {
        let normalized = self.normalizer.normalize(text);
        let outcome = self.run(&normalized, request)?;
        Ok(SearchOutput {
            skips_scanned: outcome.skips_scanned,
            truncated: outcome.truncated,
            matches: outcome.into_flat(),
        })
    }

    /// Finds and scores matches.
    ///
    /// # Errors
    ///
    /// Same as [`find`](Self::find).
    pub fn analyze(&self, text: &str, request: &SearchRequest) -> Result<AnalysisOutput, ElsError> {
        let normalized = self.normalizer.normalize(text);
        let outcome = self.run(&normalized, request)?;

        let scorer = SignificanceScorer::with_model(&self.graph, &self.normalizer, &self.model);
        let reports = scorer.score_normalized(&outcome.matches, &request.keyword, &normalized);

        tracing::debug!(
            "'{}': {} of {} matches tagged",
            request.keyword,
            reports.len(),
            outcome.match_count
        );

        Ok(AnalysisOutput {
            reports,
            match_count: outcome.match_count,
            skips_scanned: outcome.skips_scanned,
            truncated: outcome.truncated,
        })
    }

    /// Skip asked for by the request, if it names exactly one.
    ///
    /// # Errors
    ///
    /// `ElsError::InvalidSkip` for an explicit zero or a zero-weight seed.
    pub fn requested_skip(&self, request: &SearchRequest) -> Result<Option<usize>, ElsError> {
        match (request.skip, request.seed.as_deref()) {
            (Some(0), _) => Err(ElsError::InvalidSkip),
            (Some(skip), _) => Ok(Some(skip)),
            (None, Some(seed)) => match self.graph.path_weight_lossy(seed) {
                0 => Err(ElsError::InvalidSkip),
                weight => Ok(Some(weight as usize)),
            },
            (None, None) => Ok(None),
        }
    }

    fn run(&self, text: &NormalizedText, request: &SearchRequest) -> Result<SweepOutcome, ElsError> {
        let skip = self.requested_skip(request)?;

        let keyword = self.normalizer.normalize(&request.keyword);
        if keyword.is_empty() {
            tracing::warn!("keyword '{}' has no letters; nothing to search", request.keyword);
            return Ok(SweepOutcome::default());
        }

        let mut config = request.sweep.clone();
        if let Some(direction) = request.direction {
            config.directions = vec![direction];
        }
        let orchestrator = SweepOrchestrator::new(config);

        match skip {
            Some(skip) => orchestrator.sweep_range(text, &keyword, skip..=skip),
            None => orchestrator.sweep(text, &keyword),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use els_types::{LetterSymbol, Reason, DEFAULT_MATCH_BUDGET};

    fn positions(output: &SearchOutput) -> Vec<Vec<usize>> {
        output.matches.iter().map(|m| m.positions.to_vec()).collect()
    }

    #[test]
    fn explicit_skip_one_forward() {
        let engine = ElsEngine::hebrew();
        let request = SearchRequest::new("אב")
            .with_skip(1)
            .with_direction(Direction::Forward);
        let output = engine.find("אבגאבג", &request).unwrap();
        assert_eq!(positions(&output), vec![vec![0, 1], vec![3, 4]]);
        assert_eq!(output.skips_scanned, 1);
    }

    #[test]
    fn explicit_skip_two_forward() {
        let engine = ElsEngine::hebrew();
        let request = SearchRequest::new("אג")
            .with_skip(2)
            .with_direction(Direction::Forward);
        let output = engine.find("אבגאבג", &request).unwrap();
        assert_eq!(output.matches[0].positions.as_slice(), &[0, 2]);
        assert!(output.matches.iter().all(|m| m.skip == 2));
    }

    #[test]
    fn zero_skip_is_rejected_at_the_boundary() {
        let engine = ElsEngine::hebrew();
        for text in ["", "אבג", "hello"] {
            let request = SearchRequest::new("א").with_skip(0);
            assert!(matches!(engine.find(text, &request), Err(ElsError::InvalidSkip)));
            assert!(matches!(engine.analyze(text, &request), Err(ElsError::InvalidSkip)));
        }
        // Rejected even when the keyword would have been empty.
        let request = SearchRequest::new("...").with_skip(0);
        assert!(matches!(engine.find("אבג", &request), Err(ElsError::InvalidSkip)));
    }

    #[test]
    fn punctuation_keyword_is_empty_result() {
        let engine = ElsEngine::hebrew();
        let output = engine.find("אבגאבג", &SearchRequest::new("?!, .")).unwrap();
        assert!(output.matches.is_empty());
        assert!(!output.truncated);

        let analysis = engine.analyze("אבגאבג", &SearchRequest::new("")).unwrap();
        assert!(analysis.reports.is_empty());
        assert_eq!(analysis.match_count, 0);
    }

    #[test]
    fn seed_weight_selects_the_skip() {
        let engine = ElsEngine::hebrew();
        // ב = 2.
        let seeded = SearchRequest::new("אג")
            .with_seed("ב")
            .with_direction(Direction::Forward);
        assert_eq!(engine.requested_skip(&seeded).unwrap(), Some(2));
        let output = engine.find("אבגאבג", &seeded).unwrap();
        assert_eq!(positions(&output), vec![vec![0, 2], vec![3, 5]]);

        // Non-letters weigh nothing.
        let request = SearchRequest::new("אג").with_seed("b-2!");
        assert!(matches!(engine.find("אבגאבג", &request), Err(ElsError::InvalidSkip)));

        // An explicit skip wins over the seed.
        let both = SearchRequest::new("אג").with_seed("ב").with_skip(5);
        assert_eq!(engine.requested_skip(&both).unwrap(), Some(5));
    }

    #[test]
    fn direction_override_restricts_the_sweep() {
        let engine = ElsEngine::hebrew();
        let text = "אבגאבג";
        let all = engine.find(text, &SearchRequest::new("בא")).unwrap();
        assert!(all.matches.iter().any(|m| m.direction == Direction::Forward));
        assert!(all.matches.iter().any(|m| m.direction == Direction::Backward));

        let backward = engine
            .find(text, &SearchRequest::new("בא").with_direction(Direction::Backward))
            .unwrap();
        assert!(backward
            .matches
            .iter()
            .all(|m| m.direction == Direction::Backward));
    }

    #[test]
    fn positions_refer_to_the_original_text() {
        let engine = ElsEngine::hebrew();
        let text = "בְּרֵאשִׁית בָּרָא";
        let output = engine
            .find(text, &SearchRequest::new("בר").with_skip(1).with_direction(Direction::Forward))
            .unwrap();
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(output.matches.len(), 2);
        for m in &output.matches {
            let spelled: String = m.positions.iter().map(|&p| chars[p]).collect();
            assert_eq!(spelled, "בר");
        }
    }

    #[test]
    fn final_forms_match_base_letters() {
        let engine = ElsEngine::hebrew();
        let output = engine
            .find("שלום", &SearchRequest::new("לומ").with_skip(1).with_direction(Direction::Forward))
            .unwrap();
        assert_eq!(positions(&output), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn analyze_ranks_and_tags() {
        let engine = ElsEngine::hebrew();
        let text = "בראשית ברא אלהים את השמים ואת הארץ";
        let analysis = engine.analyze(text, &SearchRequest::new("את")).unwrap();
        assert!(!analysis.reports.is_empty());
        assert!(analysis.reports.len() <= analysis.match_count);
        for pair in analysis.reports.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        for report in &analysis.reports {
            assert!(!report.reasons.is_empty());
            assert_eq!(report.matched.positions.len(), 2);
        }
        // The alphabet is a single island.
        assert!(analysis
            .reports
            .iter()
            .all(|r| r.reasons.contains(&Reason::SingleIsland)));
    }

    #[test]
    fn analyze_is_deterministic() {
        let engine = ElsEngine::hebrew();
        let text = "והארץ היתה תהו ובהו וחשך על פני תהום";
        let request = SearchRequest::new("הו");
        let first = engine.analyze(text, &request).unwrap();
        let second = engine.analyze(text, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn budget_truncation_is_reported() {
        let engine = ElsEngine::hebrew();
        let text = "אבג".repeat(50);
        let request = SearchRequest::new("א").with_sweep(SweepConfig {
            max_matches: Some(10),
            ..SweepConfig::default()
        });
        let output = engine.find(&text, &request).unwrap();
        assert!(output.truncated);
        assert!(output.skips_scanned < text.chars().count() / 2);
    }

    #[test]
    fn custom_lexicon_and_weights() {
        let lexicon = Lexicon::from_json_str(r#"{ "words": ["אב"] }"#).unwrap();
        let mut scoring = ScoringConfig::default();
        scoring.weights.insert(Reason::LexiconWord, 10);
        let engine = ElsEngine::new(LetterGraph::hebrew())
            .with_lexicon(lexicon)
            .with_scoring(scoring);

        let request = SearchRequest::new("אב")
            .with_skip(1)
            .with_direction(Direction::Forward);
        let analysis = engine.analyze("אבג", &request).unwrap();
        let top = &analysis.reports[0];
        assert!(top.reasons.contains(&Reason::LexiconWord));
        assert!(top.score >= 10);
    }

    #[test]
    fn scoring_keeps_the_lexicon_and_vice_versa() {
        let lexicon = Lexicon::from_json_str(r#"{ "words": ["אב"] }"#).unwrap();
        let mut scoring = ScoringConfig::default();
        scoring.weights.insert(Reason::LexiconWord, 10);

        let engine = ElsEngine::new(LetterGraph::hebrew())
            .with_scoring(scoring.clone())
            .with_lexicon(lexicon);
        assert_eq!(engine.scoring(), &scoring);

        let request = SearchRequest::new("אב")
            .with_skip(1)
            .with_direction(Direction::Forward);
        let analysis = engine.analyze("אבג", &request).unwrap();
        assert!(analysis.reports[0].reasons.contains(&Reason::LexiconWord));
        assert!(analysis.reports[0].score >= 10);
    }

    #[test]
    fn final_form_match_weighs_like_the_keyword() {
        let engine = ElsEngine::hebrew();
        let request = SearchRequest::new("שלום")
            .with_skip(1)
            .with_direction(Direction::Forward);
        let analysis = engine.analyze("שלום", &request).unwrap();
        assert_eq!(analysis.match_count, 1);
        assert!(analysis.reports[0]
            .reasons
            .contains(&Reason::MatchedWeightEqualsKeyword));
    }

    #[test]
    fn upper_case_alphabet_matches_either_case() {
        let graph = LetterGraph::load(vec![
            LetterSymbol::new('A', 1, "B"),
            LetterSymbol::new('B', 2, ""),
        ])
        .unwrap();
        let engine = ElsEngine::new(graph);
        let request = SearchRequest::new("AB")
            .with_skip(1)
            .with_direction(Direction::Forward);
        let output = engine.find("ABAB", &request).unwrap();
        assert_eq!(positions(&output), vec![vec![0, 1], vec![2, 3]]);

        let output = engine.find("abab", &SearchRequest::new("ab").with_skip(1)).unwrap();
        assert!(output.matches.iter().any(|m| m.positions.as_slice() == [0, 1]));
    }

    #[test]
    fn default_sweep_is_not_truncated() {
        let engine = ElsEngine::hebrew();
        let text = "א".repeat(400);
        // Far more than DEFAULT_MATCH_BUDGET two-letter matches.
        let output = engine.find(&text, &SearchRequest::new("אא")).unwrap();
        assert!(!output.truncated);
        assert_eq!(output.skips_scanned, 200);
        assert!(output.matches.len() > DEFAULT_MATCH_BUDGET);

        let bounded = SearchRequest::new("אא").with_sweep(SweepConfig::bounded(200));
        assert!(engine.find(&text, &bounded).unwrap().truncated);
    }
}
