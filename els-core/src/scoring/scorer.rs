//! Significance scoring of sweep results.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use els_types::{Direction, Match, Reason, ScoringConfig, SignificanceReport};

use super::lexicon::{CompiledLexicon, Lexicon};
use crate::analyzer::{NormalizedText, TextNormalizer};
use crate::graph::{Island, LetterGraph};

/// Scorer state derived once from the graph, lexicon and configuration.
///
/// Building it compiles the lexicon and walks the graph for cycles, so
/// long-lived hosts keep one and lend it to [`SignificanceScorer::with_model`].
#[derive(Debug, Clone)]
pub struct ScoringModel {
    lexicon: CompiledLexicon,
    config: ScoringConfig,
    loop_letters: BTreeSet<char>,
    hub: Option<char>,
}

impl ScoringModel {
    /// Compiles `lexicon` and collects the graph's loop letters and hub.
    pub fn new(
        graph: &LetterGraph,
        normalizer: &TextNormalizer,
        lexicon: &Lexicon,
        config: ScoringConfig,
    ) -> Self {
        let mut loop_letters = graph.self_loops();
        loop_letters.extend(graph.cyclic_letters());
        Self {
            lexicon: lexicon.compile(normalizer),
            config,
            loop_letters,
            hub: graph.hub(),
        }
    }

    /// The scoring configuration.
    #[inline]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

/// Attaches significance tags to matches and ranks them.
pub struct SignificanceScorer<'g> {
    graph: &'g LetterGraph,
    normalizer: &'g TextNormalizer,
    model: Cow<'g, ScoringModel>,
}

impl<'g> SignificanceScorer<'g> {
    /// Creates a scorer with its own [`ScoringModel`].
    pub fn new(
        graph: &'g LetterGraph,
        normalizer: &'g TextNormalizer,
        lexicon: &Lexicon,
        config: ScoringConfig,
    ) -> Self {
        let model = ScoringModel::new(graph, normalizer, lexicon, config);
        Self {
            graph,
            normalizer,
            model: Cow::Owned(model),
        }
    }

    /// Creates a scorer over a model built earlier for the same graph.
    pub fn with_model(
        graph: &'g LetterGraph,
        normalizer: &'g TextNormalizer,
        model: &'g ScoringModel,
    ) -> Self {
        Self {
            graph,
            normalizer,
            model: Cow::Borrowed(model),
        }
    }

    /// Scores matches found in `original`.
    ///
    /// Reports with no tags are dropped. The result is ordered by score
    /// (descending), then skip, first position and direction.
    pub fn score(
        &self,
        matches: &BTreeMap<usize, Vec<Match>>,
        keyword: &str,
        original: &str,
    ) -> Vec<SignificanceReport> {
        let text = self.normalizer.normalize(original);
        self.score_normalized(matches, keyword, &text)
    }

    /// Like [`score`](Self::score) when the caller already holds the
    /// normalized original text.
    pub fn score_normalized(
        &self,
        matches: &BTreeMap<usize, Vec<Match>>,
        keyword: &str,
        text: &NormalizedText,
    ) -> Vec<SignificanceReport> {
        let keyword = self.normalizer.normalize(keyword).as_string();
        let keyword_weight = self.graph.path_weight(keyword.chars()).ok();

        let mut reports = Vec::new();
        for (&skip, group) in matches {
            let mut starts: Vec<usize> = group.iter().map(Match::first_position).collect();
            starts.sort_unstable();

            for m in group {
                let reasons = self.reasons_for(m, group.len(), &starts, keyword_weight, text);
                if reasons.is_empty() {
                    continue;
                }
                let score = reasons
                    .iter()
                    .map(|&r| self.model.config.weight(r))
                    .fold(0u32, u32::saturating_add);
                reports.push(SignificanceReport {
                    matched: m.clone(),
                    reasons,
                    score,
                });
            }

            tracing::trace!("scored {} matches at skip {}", group.len(), skip);
        }

        reports.sort_by(|a, b| b.cmp(a));
        reports
    }

    fn reasons_for(
        &self,
        m: &Match,
        group_len: usize,
        starts: &[usize],
        keyword_weight: Option<u64>,
        text: &NormalizedText,
    ) -> BTreeSet<Reason> {
        let mut reasons = BTreeSet::new();
        let letters: Vec<char> = m.keyword.chars().collect();

        // Numeric coincidences.
        if let Some(weight) = keyword_weight {
            if m.skip as u64 == weight {
                reasons.insert(Reason::SkipEqualsKeywordWeight);
            }
            match matched_letters(m, text) {
                Some(matched) => match self.graph.path_weight(matched) {
                    Ok(matched) if matched == weight => {
                        reasons.insert(Reason::MatchedWeightEqualsKeyword);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::trace!("matched letters not weighable: {}", e),
                },
                None => tracing::trace!("{} has positions outside the text", m),
            }
        }

        if group_len >= self.model.config.high_frequency_threshold {
            reasons.insert(Reason::HighFrequencySkip);
        }

        if self.is_clustered(m.first_position(), starts) {
            reasons.insert(Reason::Clustered);
        }

        if let Some((island, count)) = self.dominant_island(&letters) {
            if count == letters.len() {
                reasons.insert(Reason::SingleIsland);
            } else {
                reasons.insert(Reason::MajorityIsland);
            }
            if m.skip as u64 == island.combined_weight {
                reasons.insert(Reason::SkipEqualsIslandWeight);
            }
        }

        if letters.iter().any(|c| self.model.loop_letters.contains(c)) {
            reasons.insert(Reason::LoopLetter);
        }
        if let Some(hub) = self.model.hub {
            if letters.contains(&hub) {
                reasons.insert(Reason::HubLetter);
            }
        }

        if self.lexicon_word(m, &letters, text) {
            reasons.insert(Reason::LexiconWord);
        }
        if self.model.lexicon.has_affix(&m.keyword) {
            reasons.insert(Reason::LexiconAffix);
        }

        reasons
    }

    /// Another match under the same skip starts less than `cluster_distance` away.
    fn is_clustered(&self, start: usize, starts: &[usize]) -> bool {
        let d = self.model.config.cluster_distance;
        if d == 0 {
            return false;
        }
        let lo = starts.partition_point(|&s| s + d <= start);
        let hi = starts.partition_point(|&s| s < start.saturating_add(d));
        // The match itself is always inside the window.
        hi - lo > 1
    }

    /// Island holding all or a strict majority of `letters`.
    fn dominant_island(&self, letters: &[char]) -> Option<(&'g Island, usize)> {
        let islands = self.graph.islands();
        let mut counts = vec![0usize; islands.len()];
        for &c in letters {
            if let Some(i) = self.graph.island_index(c) {
                counts[i] += 1;
            }
        }
        counts
            .iter()
            .enumerate()
            .find(|&(_, &count)| count * 2 > letters.len())
            .map(|(i, &count)| (&islands[i], count))
    }

    /// The matched letters, optionally wrapped in up to `lexicon_context`
    /// neighbouring text letters on either side (in reading order), spell a
    /// lexicon word.
    fn lexicon_word(&self, m: &Match, letters: &[char], text: &NormalizedText) -> bool {
        if self.model.lexicon.longest_word() < letters.len() {
            return false;
        }
        let ctx = self.model.config.lexicon_context;
        let map = text.index_map();
        let all = text.letters();

        let (Some(&first_read), Some(&last_read)) = (m.positions.first(), m.positions.last()) else {
            return false;
        };
        let (Ok(first), Ok(last)) = (map.binary_search(&first_read), map.binary_search(&last_read))
        else {
            return false;
        };

        let (lead, trail): (Vec<char>, Vec<char>) = match m.direction {
            Direction::Forward => (
                all[first.saturating_sub(ctx)..first].to_vec(),
                all[(last + 1).min(all.len())..(last + 1 + ctx).min(all.len())].to_vec(),
            ),
            Direction::Backward => (
                all[(first + 1).min(all.len())..(first + 1 + ctx).min(all.len())]
                    .iter()
                    .rev()
                    .copied()
                    .collect(),
                all[last.saturating_sub(ctx)..last].iter().rev().copied().collect(),
            ),
        };

        let mut candidate = String::new();
        for take_lead in 0..=lead.len() {
            for take_trail in 0..=trail.len() {
                candidate.clear();
                candidate.extend(&lead[lead.len() - take_lead..]);
                candidate.extend(letters);
                candidate.extend(&trail[..take_trail]);
                if self.model.lexicon.contains_word(&candidate) {
                    return true;
                }
            }
        }
        false
    }
}

/// Canonical letters of the text at the match's positions, in reading order.
fn matched_letters(m: &Match, text: &NormalizedText) -> Option<Vec<char>> {
    m.positions
        .iter()
        .map(|p| {
            text.index_map()
                .binary_search(p)
                .ok()
                .map(|i| text.letters()[i])
        })
        .collect()
}
