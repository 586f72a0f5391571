//! Word and affix lists consulted by the scorer.
//!
//! The lexicon is data, not code: it is read from JSON so it can be swapped
//! or audited without touching the search. A small default list ships in
//! `data/lexicon.json`.

use std::fs;
use std::path::Path;

use els_types::ElsError;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::analyzer::TextNormalizer;

const BUNDLED: &str = include_str!("../../data/lexicon.json");

/// Words, prefixes and suffixes, as loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Whole words and phrases.
    pub words: Vec<String>,
    /// Known prefixes.
    pub prefixes: Vec<String>,
    /// Known suffixes.
    pub suffixes: Vec<String>,
}

impl Lexicon {
    /// Parses a lexicon from JSON.
    ///
    /// # Errors
    ///
    /// `ElsError::Lexicon` if the JSON does not describe a lexicon.
    pub fn from_json_str(json: &str) -> Result<Self, ElsError> {
        serde_json::from_str(json).map_err(|e| ElsError::Lexicon(e.to_string()))
    }

    /// Reads a lexicon from a JSON file.
    ///
    /// # Errors
    ///
    /// `ElsError::Io` if the file cannot be read, `ElsError::Lexicon` if it
    /// does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ElsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let lexicon = Self::from_json_str(&json)?;
        tracing::debug!(
            "loaded lexicon from {}: {} words, {} prefixes, {} suffixes",
            path.as_ref().display(),
            lexicon.words.len(),
            lexicon.prefixes.len(),
            lexicon.suffixes.len()
        );
        Ok(lexicon)
    }

    /// The list bundled with the crate.
    pub fn bundled() -> Self {
        Self::from_json_str(BUNDLED).unwrap_or_else(|e| {
            tracing::error!("bundled lexicon is unreadable: {}", e);
            Self::default()
        })
    }

    /// Returns `true` if the lexicon has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.prefixes.is_empty() && self.suffixes.is_empty()
    }

    /// Rewrites every entry into the normalizer's canonical letters.
    ///
    /// Entries that normalize to nothing are dropped.
    pub fn compile(&self, normalizer: &TextNormalizer) -> CompiledLexicon {
        let canon = |entries: &[String]| -> Vec<String> {
            entries
                .iter()
                .map(|e| normalizer.normalize(e).as_string())
                .filter(|e| !e.is_empty())
                .collect()
        };
        let words: FxHashSet<String> = canon(&self.words).into_iter().collect();
        let longest_word = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        CompiledLexicon {
            words,
            prefixes: canon(&self.prefixes),
            suffixes: canon(&self.suffixes),
            longest_word,
        }
    }
}

/// Lexicon in canonical letters, ready for lookups.
#[derive(Debug, Clone, Default)]
pub struct CompiledLexicon {
    words: FxHashSet<String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    longest_word: usize,
}

impl CompiledLexicon {
    /// Exact word lookup.
    #[inline]
    pub fn contains_word(&self, candidate: &str) -> bool {
        self.words.contains(candidate)
    }

    /// Length in letters of the longest word.
    #[inline]
    pub fn longest_word(&self) -> usize {
        self.longest_word
    }

    /// Returns `true` if `letters` starts with a known prefix or ends with a
    /// known suffix, and is longer than that affix.
    pub fn has_affix(&self, letters: &str) -> bool {
        self.prefixes
            .iter()
            .any(|p| letters.len() > p.len() && letters.starts_with(p.as_str()))
            || self
                .suffixes
                .iter()
                .any(|s| letters.len() > s.len() && letters.ends_with(s.as_str()))
    }
}
