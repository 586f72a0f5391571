//! Skip sweep: runs the searcher over a range of skips and both directions.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use els_types::{Direction, ElsError, Match, SweepConfig};
use rayon::prelude::*;

use super::searcher::{Hit, SkipSequenceSearcher};
use crate::analyzer::NormalizedText;

/// Skips handed to the thread pool per budget check in parallel mode.
pub const PARALLEL_CHUNK: usize = 64;

/// Result of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Matches keyed by skip. Skips without matches are absent.
    pub matches: BTreeMap<usize, Vec<Match>>,
    /// Number of skips fully scanned.
    pub skips_scanned: usize,
    /// Total number of matches across all skips.
    pub match_count: usize,
    /// `true` if a budget stopped the sweep before the last skip.
    pub truncated: bool,
}

impl SweepOutcome {
    /// All matches, ordered by skip then by scan order.
    pub fn into_flat(self) -> Vec<Match> {
        self.matches.into_values().flatten().collect()
    }

    fn absorb(&mut self, skip: usize, matches: Vec<Match>) {
        self.skips_scanned += 1;
        if !matches.is_empty() {
            self.match_count += matches.len();
            self.matches.insert(skip, matches);
        }
    }
}

/// Drives [`SkipSequenceSearcher`] across skips and directions.
#[derive(Debug, Clone, Default)]
pub struct SweepOrchestrator {
    config: SweepConfig,
    searcher: SkipSequenceSearcher,
}

impl SweepOrchestrator {
    /// Creates an orchestrator with the given configuration.
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            searcher: SkipSequenceSearcher,
        }
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Largest skip swept over a text of `len` letters.
    ///
    /// Defaults to half the length. A skip at or past `len` can only ever
    /// fit a single letter, so explicit limits are clamped to `len`.
    pub fn max_skip_for(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.config.max_skip.unwrap_or(len / 2).clamp(1, len)
    }

    /// Sweeps skips `1..=max_skip_for(text.len())`.
    ///
    /// # Errors
    ///
    /// `ElsError::EmptyKeyword` if `keyword` has no letters.
    pub fn sweep(
        &self,
        text: &NormalizedText,
        keyword: &NormalizedText,
    ) -> Result<SweepOutcome, ElsError> {
        let max_skip = self.max_skip_for(text.len());
        if max_skip == 0 {
            if keyword.is_empty() {
                return Err(ElsError::EmptyKeyword);
            }
            return Ok(SweepOutcome::default());
        }
        self.sweep_range(text, keyword, 1..=max_skip)
    }

    /// Sweeps an explicit range of skips.
    ///
    /// # Errors
    ///
    /// `ElsError::InvalidSkip` if the range includes zero,
    /// `ElsError::EmptyKeyword` if `keyword` has no letters.
    pub fn sweep_range(
        &self,
        text: &NormalizedText,
        keyword: &NormalizedText,
        skips: RangeInclusive<usize>,
    ) -> Result<SweepOutcome, ElsError> {
        if *skips.start() == 0 {
            return Err(ElsError::InvalidSkip);
        }
        if keyword.is_empty() {
            return Err(ElsError::EmptyKeyword);
        }

        let started = Instant::now();
        let keyword_str = keyword.as_string();
        let mut outcome = SweepOutcome::default();

        tracing::debug!(
            "sweeping '{}' over {} letters, skips {}..={}",
            keyword_str,
            text.len(),
            skips.start(),
            skips.end()
        );

        if self.config.parallel {
            let all: Vec<usize> = skips.collect();
            for chunk in all.chunks(PARALLEL_CHUNK) {
                if self.budget_exhausted(&outcome, started) {
                    outcome.truncated = true;
                    break;
                }
                let scanned: Vec<(usize, Vec<Match>)> = chunk
                    .par_iter()
                    .map(|&skip| -> Result<(usize, Vec<Match>), ElsError> {
                        Ok((skip, self.scan_skip(text, keyword, &keyword_str, skip)?))
                    })
                    .collect::<Result<_, _>>()?;
                for (skip, matches) in scanned {
                    outcome.absorb(skip, matches);
                }
            }
        } else {
            for skip in skips {
                if self.budget_exhausted(&outcome, started) {
                    outcome.truncated = true;
                    break;
                }
                let matches = self.scan_skip(text, keyword, &keyword_str, skip)?;
                outcome.absorb(skip, matches);
            }
        }

        if outcome.truncated {
            tracing::warn!(
                "sweep for '{}' stopped early after {} skips ({} matches)",
                keyword_str,
                outcome.skips_scanned,
                outcome.match_count
            );
        } else {
            tracing::debug!(
                "sweep for '{}' done: {} matches over {} skips in {:?}",
                keyword_str,
                outcome.match_count,
                outcome.skips_scanned,
                started.elapsed()
            );
        }

        Ok(outcome)
    }

    /// Scans one skip in every configured direction and translates the hits.
    fn scan_skip(
        &self,
        text: &NormalizedText,
        keyword: &NormalizedText,
        keyword_str: &str,
        skip: usize,
    ) -> Result<Vec<Match>, ElsError> {
        let mut matches = Vec::new();
        let mut hits: Vec<Hit> = Vec::new();

        for &direction in &self.config.directions {
            hits.clear();
            self.searcher
                .search_into(text.codes(), keyword.codes(), skip, direction, &mut hits)?;

            for hit in hits.drain(..) {
                match text.translate(&hit) {
                    Some(positions) => matches.push(Match {
                        keyword: keyword_str.to_owned(),
                        skip,
                        direction,
                        positions,
                    }),
                    None => {
                        let fault = ElsError::IndexMappingFault {
                            index: hit.iter().copied().max().unwrap_or(0),
                            len: text.len(),
                        };
                        tracing::error!("dropping {} match at skip {}: {}", direction, skip, fault);
                    }
                }
            }
        }

        Ok(matches)
    }

    fn budget_exhausted(&self, outcome: &SweepOutcome, started: Instant) -> bool {
        if let Some(limit) = self.config.max_matches {
            if outcome.match_count >= limit {
                return true;
            }
        }
        if let Some(ms) = self.config.time_budget_ms {
            if started.elapsed() >= Duration::from_millis(ms) {
                return true;
            }
        }
        false
    }
}

/// Convenience wrapper: one direction at one skip, translated to matches.
pub fn matches_at(
    text: &NormalizedText,
    keyword: &NormalizedText,
    skip: usize,
    direction: Direction,
) -> Result<Vec<Match>, ElsError> {
    let orchestrator = SweepOrchestrator::new(SweepConfig {
        directions: vec![direction],
        max_matches: None,
        ..SweepConfig::default()
    });
    Ok(orchestrator
        .sweep_range(text, keyword, skip..=skip)?
        .into_flat())
}
