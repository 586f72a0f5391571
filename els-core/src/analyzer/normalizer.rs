//! Text normalization.
//!
//! Keeps only the alphabet's letters (case and final forms folded) and
//! records where each one sat in the original text.

use smallvec::SmallVec;

use els_types::Position;

use super::alphabet::Alphabet;
use crate::graph::LetterGraph;

/// Letters-only view of a text plus the way back to the original.
///
/// Invariants:
/// - `letters`, `codes` and `index_map` have the same length
/// - `index_map` is strictly increasing
/// - `index_map[i]` is the character index in the original text of letter `i`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    letters: Vec<char>,
    codes: Vec<u8>,
    index_map: Vec<Position>,
}

impl NormalizedText {
    /// Canonical letters.
    #[inline(always)]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// One alphabet code per letter.
    #[inline(always)]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Original-text position of each letter.
    #[inline(always)]
    pub fn index_map(&self) -> &[Position] {
        &self.index_map
    }

    /// Number of letters kept.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no letters were kept.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The letters as a string.
    pub fn as_string(&self) -> String {
        self.letters.iter().collect()
    }

    /// Original-text position of normalized index `i`.
    #[inline(always)]
    pub fn original_position(&self, i: usize) -> Option<Position> {
        self.index_map.get(i).copied()
    }

    /// Translates normalized indices to original positions.
    ///
    /// Returns `None` if any index is out of range.
    pub fn translate(&self, indices: &[usize]) -> Option<SmallVec<[Position; 8]>> {
        indices.iter().map(|&i| self.original_position(i)).collect()
    }

    /// Letters at the given normalized indices.
    pub fn letters_at(&self, indices: &[usize]) -> Option<String> {
        indices.iter().map(|&i| self.letters.get(i).copied()).collect()
    }

    fn clear(&mut self) {
        self.letters.clear();
        self.codes.clear();
        self.index_map.clear();
    }
}

/// Strips everything that is not an alphabet letter, remembering where
/// each kept letter came from.
///
/// # Examples
///
/// ```
/// use els_core::analyzer::TextNormalizer;
/// use els_core::graph::LetterGraph;
///
/// let normalizer = TextNormalizer::for_graph(&LetterGraph::hebrew());
/// let text = normalizer.normalize("אב, גד");
/// assert_eq!(text.as_string(), "אבגד");
/// assert_eq!(text.index_map(), &[0, 1, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    alphabet: Alphabet,
}

impl TextNormalizer {
    /// Creates a normalizer over `alphabet`.
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// Creates a normalizer over the graph's letters and default aliases.
    pub fn for_graph(graph: &LetterGraph) -> Self {
        Self::new(Alphabet::from_graph(graph))
    }

    /// The alphabet in use.
    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Normalizes into an existing buffer, reusing its capacity.
    pub fn normalize_into(&self, input: &str, out: &mut NormalizedText) {
        out.clear();

        // Hebrew is two bytes per letter; a byte-length reserve would
        // over-allocate by about half.
        let estimate = input.len() / 2 + 1;
        out.letters.reserve(estimate);
        out.codes.reserve(estimate);
        out.index_map.reserve(estimate);

        for (position, c) in input.chars().enumerate() {
            if let Some(code) = self.alphabet.code(c) {
                out.codes.push(code);
                out.letters.push(self.alphabet.symbol(code).unwrap_or(c));
                out.index_map.push(position);
            }
        }
    }

    /// Normalizes `input` into a fresh buffer.
    #[inline]
    pub fn normalize(&self, input: &str) -> NormalizedText {
        let mut out = NormalizedText::default();
        self.normalize_into(input, &mut out);
        out
    }
}
