//! Letter relationship graph.
//!
//! Each letter is a node carrying its gematria weight; edges run from a
//! letter to every letter in its decomposition. The graph is not a tree:
//! self-loops, short cycles and disjoint components are all expected.
//!
//! Memory layout:
//! - Nodes are stored densely in load order; `FxHashMap` maps a symbol to its slot
//! - Forward and reverse adjacency are precomputed slot lists
//! - Islands are computed once on first request and cached on the graph
//!
//! The graph is immutable after [`LetterGraph::load`], so it can be shared
//! freely across threads.

mod islands;
mod table;
mod traverse;

pub use islands::Island;
pub use table::HEBREW_FINAL_FORMS;
pub use traverse::{SlotSet, Traversal, TraversalOrder};

use std::collections::BTreeSet;
use std::sync::OnceLock;

use els_types::{ElsError, LetterSymbol};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Largest alphabet supported; normalized text stores one byte per letter.
pub const MAX_SYMBOLS: usize = 255;

pub(crate) type Adjacency = SmallVec<[u8; 4]>;

/// Immutable directed graph over the alphabet's letters.
#[derive(Debug)]
pub struct LetterGraph {
    pub(crate) nodes: Vec<LetterSymbol>,
    pub(crate) slots: FxHashMap<char, u8>,
    /// Decomposition targets present in the graph, deduplicated, per slot.
    pub(crate) out_edges: Vec<Adjacency>,
    /// Slots whose decomposition mentions this slot.
    pub(crate) in_edges: Vec<Adjacency>,
    pub(crate) islands: OnceLock<Vec<Island>>,
}

impl LetterGraph {
    /// Builds the graph from a letter table.
    ///
    /// # Errors
    ///
    /// Returns `ElsError::DuplicateSymbol` if a symbol appears twice and
    /// `ElsError::AlphabetTooLarge` past [`MAX_SYMBOLS`] entries.
    pub fn load(symbols: Vec<LetterSymbol>) -> Result<Self, ElsError> {
        if symbols.len() > MAX_SYMBOLS {
            return Err(ElsError::AlphabetTooLarge {
                count: symbols.len(),
                max: MAX_SYMBOLS,
            });
        }

        let mut slots = FxHashMap::default();
        slots.reserve(symbols.len());
        for (slot, letter) in symbols.iter().enumerate() {
            if slots.insert(letter.symbol, slot as u8).is_some() {
                return Err(ElsError::DuplicateSymbol(letter.symbol));
            }
        }

        let mut out_edges: Vec<Adjacency> = vec![Adjacency::new(); symbols.len()];
        let mut in_edges: Vec<Adjacency> = vec![Adjacency::new(); symbols.len()];
        for (slot, letter) in symbols.iter().enumerate() {
            for c in &letter.decomposition {
                match slots.get(c) {
                    Some(&target) => {
                        if !out_edges[slot].contains(&target) {
                            out_edges[slot].push(target);
                            in_edges[target as usize].push(slot as u8);
                        }
                    }
                    None => {
                        tracing::debug!(
                            "letter '{}' decomposes into '{}' which is not in the table",
                            letter.symbol,
                            c
                        );
                    }
                }
            }
        }

        tracing::debug!("letter graph loaded: {} symbols", symbols.len());

        Ok(Self {
            nodes: symbols,
            slots,
            out_edges,
            in_edges,
            islands: OnceLock::new(),
        })
    }

    /// The built-in 22-letter Hebrew table.
    pub fn hebrew() -> Self {
        // The table is static and duplicate-free; `load` cannot fail on it.
        match Self::load(table::hebrew_letters()) {
            Ok(graph) => graph,
            Err(e) => unreachable!("built-in letter table rejected: {e}"),
        }
    }

    /// Number of letters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no letters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Letters in load order.
    #[inline]
    pub fn symbols(&self) -> &[LetterSymbol] {
        &self.nodes
    }

    /// Looks up a letter.
    #[inline]
    pub fn get(&self, symbol: char) -> Option<&LetterSymbol> {
        self.slot(symbol).map(|s| &self.nodes[s as usize])
    }

    /// Returns `true` if `symbol` is a node.
    #[inline]
    pub fn contains(&self, symbol: char) -> bool {
        self.slots.contains_key(&symbol)
    }

    #[inline]
    pub(crate) fn slot(&self, symbol: char) -> Option<u8> {
        self.slots.get(&symbol).copied()
    }

    /// Weight of a single letter.
    ///
    /// # Errors
    ///
    /// `ElsError::UnknownSymbol` if the letter is not in the graph.
    #[inline]
    pub fn weight(&self, symbol: char) -> Result<u32, ElsError> {
        self.get(symbol)
            .map(|l| l.weight)
            .ok_or(ElsError::UnknownSymbol(symbol))
    }

    /// Sums letter weights along `sequence`.
    ///
    /// # Errors
    ///
    /// Fails on the first character that is not a node; no partial total is returned.
    pub fn path_weight<I>(&self, sequence: I) -> Result<u64, ElsError>
    where
        I: IntoIterator<Item = char>,
    {
        sequence
            .into_iter()
            .try_fold(0u64, |acc, c| Ok(acc + self.weight(c)? as u64))
    }

    /// Sums letter weights, counting characters outside the graph as zero.
    ///
    /// Meant for user input such as keywords and seeds, where punctuation
    /// and foreign letters are routine.
    pub fn path_weight_lossy(&self, text: &str) -> u64 {
        text.chars()
            .filter_map(|c| self.get(c))
            .map(|l| l.weight as u64)
            .sum()
    }

    /// Lazily walks decomposition edges from `start`.
    pub fn traverse(&self, start: char, order: TraversalOrder) -> Traversal<'_> {
        Traversal::new(self, self.slot(start), order)
    }

    /// Number of distinct letters whose decomposition mentions `symbol`.
    pub fn in_degree(&self, symbol: char) -> usize {
        self.slot(symbol)
            .map(|s| self.in_edges[s as usize].len())
            .unwrap_or(0)
    }

    /// Letter with the highest in-degree.
    ///
    /// Ties go to the lower weight, then the lower code point.
    pub fn hub(&self) -> Option<char> {
        self.nodes
            .iter()
            .enumerate()
            .max_by(|(a_slot, a), (b_slot, b)| {
                self.in_edges[*a_slot]
                    .len()
                    .cmp(&self.in_edges[*b_slot].len())
                    .then_with(|| b.weight.cmp(&a.weight))
                    .then_with(|| b.symbol.cmp(&a.symbol))
            })
            .filter(|(slot, _)| !self.in_edges[*slot].is_empty())
            .map(|(_, l)| l.symbol)
    }

    /// Letters whose decomposition contains themselves.
    pub fn self_loops(&self) -> BTreeSet<char> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(slot, _)| self.out_edges[*slot].contains(&(*slot as u8)))
            .map(|(_, l)| l.symbol)
            .collect()
    }

    /// Pairs `(x, y)` with `x < y` where each decomposes into the other.
    pub fn two_cycles(&self) -> BTreeSet<(char, char)> {
        let mut pairs = BTreeSet::new();
        for (slot, targets) in self.out_edges.iter().enumerate() {
            for &target in targets {
                if target as usize != slot && self.out_edges[target as usize].contains(&(slot as u8))
                {
                    let a = self.nodes[slot].symbol;
                    let b = self.nodes[target as usize].symbol;
                    pairs.insert((a.min(b), a.max(b)));
                }
            }
        }
        pairs
    }

    /// Letters that can reach themselves along decomposition edges.
    ///
    /// Includes self-loops and every letter on a longer cycle.
    pub fn cyclic_letters(&self) -> BTreeSet<char> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(slot, _)| {
                let slot = *slot as u8;
                self.out_edges[slot as usize].iter().any(|&next| {
                    next == slot
                        || Traversal::from_slot(self, next, TraversalOrder::DepthFirst)
                            .any(|l| l.symbol == self.nodes[slot as usize].symbol)
                })
            })
            .map(|(_, l)| l.symbol)
            .collect()
    }

    /// Letters reached in one step from `symbol`, in decomposition order.
    pub fn successors(&self, symbol: char) -> impl Iterator<Item = &LetterSymbol> + '_ {
        self.slot(symbol)
            .map(|s| self.out_edges[s as usize].as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&t| &self.nodes[t as usize])
    }
}
