//! Letter → byte code mapping.
//!
//! Normalized text is stored as one byte per letter so the searcher can
//! scan it with `memchr`. Codes are the letter's slot in the graph.

use rustc_hash::FxHashMap;

use crate::graph::{LetterGraph, HEBREW_FINAL_FORMS};

/// Marks an ASCII byte that is not an alphabet letter.
const NOT_A_LETTER: u8 = u8::MAX;

/// Maps characters (after case folding and aliasing) to dense letter codes.
#[derive(Debug, Clone)]
pub struct Alphabet {
    /// Canonical letter for each code.
    symbols: Vec<char>,
    /// Direct lookup for ASCII input.
    ascii: [u8; 128],
    /// Everything else, aliases included.
    codes: FxHashMap<char, u8>,
}

impl Alphabet {
    /// Builds the alphabet from the graph's keys.
    ///
    /// Hebrew final forms are registered as aliases of their base letters
    /// when the base letter is present.
    pub fn from_graph(graph: &LetterGraph) -> Self {
        let mut alphabet = Self {
            symbols: Vec::with_capacity(graph.len()),
            ascii: [NOT_A_LETTER; 128],
            codes: FxHashMap::default(),
        };

        for (code, letter) in graph.symbols().iter().enumerate() {
            alphabet.symbols.push(letter.symbol);
            alphabet.register(letter.symbol, code as u8);
        }

        for (final_form, base) in HEBREW_FINAL_FORMS {
            alphabet = alphabet.with_alias(final_form, base);
        }

        alphabet
    }

    /// Registers `alias` as another spelling of `target`.
    ///
    /// Ignored if `target` is not a letter of the alphabet.
    pub fn with_alias(mut self, alias: char, target: char) -> Self {
        if let Some(code) = self.code(target) {
            self.register(alias, code);
        }
        self
    }

    /// Stores `c` under its lower-case form, the form [`code`](Self::code)
    /// looks up.
    fn register(&mut self, c: char, code: u8) {
        if c.is_ascii() {
            self.ascii[c.to_ascii_lowercase() as usize] = code;
        } else {
            let folded = c.to_lowercase().next().unwrap_or(c);
            self.codes.insert(folded, code);
        }
    }

    /// Code of `c`, folding case first.
    #[inline(always)]
    pub fn code(&self, c: char) -> Option<u8> {
        if c.is_ascii() {
            let code = self.ascii[c.to_ascii_lowercase() as usize];
            return (code != NOT_A_LETTER).then_some(code);
        }
        if let Some(&code) = self.codes.get(&c) {
            return Some(code);
        }
        let folded = c.to_lowercase().next()?;
        if folded == c {
            return None;
        }
        self.codes.get(&folded).copied()
    }

    /// Canonical letter for `code`.
    #[inline(always)]
    pub fn symbol(&self, code: u8) -> Option<char> {
        self.symbols.get(code as usize).copied()
    }

    /// Number of distinct letters.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the alphabet has no letters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
