//! Cycle-safe traversal over the letter graph.
//!
//! The walk is driven by an explicit worklist (a stack for depth-first, a
//! queue for breadth-first) and a visited bitset. There is no recursion, so
//! self-loops and cycles cannot stall it: a letter is marked when it is
//! first pushed and never pushed again.

use std::borrow::BorrowMut;
use std::collections::VecDeque;

use els_types::LetterSymbol;

use super::LetterGraph;

/// Visit order for [`LetterGraph::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Follow the first unvisited decomposition letter as deep as possible.
    DepthFirst,
    /// Visit all letters one step away before going further.
    BreadthFirst,
}

/// Which edges a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeMode {
    /// Letter → decomposition letters.
    Directed,
    /// Both directions; used for island partitioning.
    Undirected,
}

/// 256-bit set of graph slots, used as a traversal's visited set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSet([u64; 4]);

impl SlotSet {
    /// Inserts a slot; returns `false` if it was already present.
    #[inline(always)]
    pub(crate) fn insert(&mut self, slot: u8) -> bool {
        let word = &mut self.0[(slot >> 6) as usize];
        let bit = 1u64 << (slot & 63);
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Returns `true` if `slot` is in the set.
    #[inline(always)]
    pub fn contains(&self, slot: u8) -> bool {
        self.0[(slot >> 6) as usize] & (1u64 << (slot & 63)) != 0
    }

    /// Number of slots in the set.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Lazy walk over the letters reachable from a start letter.
///
/// The visited set is either owned (the default) or borrowed, so that
/// several walks can share one set and together cover each letter once.
pub struct Traversal<'g, V = SlotSet>
where
    V: BorrowMut<SlotSet>,
{
    graph: &'g LetterGraph,
    worklist: VecDeque<u8>,
    visited: V,
    order: TraversalOrder,
    edges: EdgeMode,
}

impl<'g> Traversal<'g> {
    pub(crate) fn new(graph: &'g LetterGraph, start: Option<u8>, order: TraversalOrder) -> Self {
        Self::with_visited(graph, start, order, EdgeMode::Directed, SlotSet::default())
    }

    pub(crate) fn from_slot(graph: &'g LetterGraph, start: u8, order: TraversalOrder) -> Self {
        Self::new(graph, Some(start), order)
    }
}

impl<'g, V> Traversal<'g, V>
where
    V: BorrowMut<SlotSet>,
{
    pub(crate) fn with_visited(
        graph: &'g LetterGraph,
        start: Option<u8>,
        order: TraversalOrder,
        edges: EdgeMode,
        mut visited: V,
    ) -> Self {
        let mut worklist = VecDeque::with_capacity(graph.len().min(32));
        if let Some(slot) = start {
            if visited.borrow_mut().insert(slot) {
                worklist.push_back(slot);
            }
        }
        Self {
            graph,
            worklist,
            visited,
            order,
            edges,
        }
    }

    #[inline]
    fn push_unvisited(&mut self, slot: u8) {
        let graph = self.graph;
        let visited = self.visited.borrow_mut();

        let forward = graph.out_edges[slot as usize].iter();
        let backward = match self.edges {
            EdgeMode::Directed => [].iter(),
            EdgeMode::Undirected => graph.in_edges[slot as usize].iter(),
        };

        match self.order {
            TraversalOrder::BreadthFirst => {
                for &next in forward.chain(backward) {
                    if visited.insert(next) {
                        self.worklist.push_back(next);
                    }
                }
            }
            TraversalOrder::DepthFirst => {
                // Reverse so the first decomposition letter is popped first.
                let mut pending: smallvec::SmallVec<[u8; 8]> = smallvec::SmallVec::new();
                for &next in forward.chain(backward) {
                    if visited.insert(next) {
                        pending.push(next);
                    }
                }
                self.worklist.extend(pending.into_iter().rev());
            }
        }
    }
}

impl<'g, V> Iterator for Traversal<'g, V>
where
    V: BorrowMut<SlotSet>,
{
    type Item = &'g LetterSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = match self.order {
            TraversalOrder::DepthFirst => self.worklist.pop_back()?,
            TraversalOrder::BreadthFirst => self.worklist.pop_front()?,
        };
        self.push_unvisited(slot);
        Some(&self.graph.nodes[slot as usize])
    }
}
