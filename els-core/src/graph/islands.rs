//! Connected components ("islands") of the letter graph.

use std::collections::BTreeSet;

use els_types::Tier;
use serde::Serialize;

use super::traverse::{EdgeMode, SlotSet, Traversal, TraversalOrder};
use super::LetterGraph;

/// A maximal set of letters connected by decomposition, ignoring edge direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Island {
    /// Letters in the island.
    pub members: BTreeSet<char>,
    /// Sum of the members' weights.
    pub combined_weight: u64,
}

impl Island {
    /// Returns `true` if `symbol` belongs to the island.
    #[inline]
    pub fn contains(&self, symbol: char) -> bool {
        self.members.contains(&symbol)
    }

    /// Tier named by the island's combined weight, if any.
    #[inline]
    pub fn tier(&self) -> Option<Tier> {
        Tier::from_weight(self.combined_weight)
    }
}

impl LetterGraph {
    /// Partitions the letters into islands.
    ///
    /// Every letter lands in exactly one island. Islands are ordered by
    /// their smallest member. Computed on first call and cached.
    pub fn islands(&self) -> &[Island] {
        self.islands.get_or_init(|| self.compute_islands())
    }

    fn compute_islands(&self) -> Vec<Island> {
        let mut visited = SlotSet::default();
        let mut islands = Vec::new();

        for slot in 0..self.nodes.len() as u8 {
            if visited.contains(slot) {
                continue;
            }

            let mut members = BTreeSet::new();
            let mut combined_weight = 0u64;
            for letter in Traversal::with_visited(
                self,
                Some(slot),
                TraversalOrder::BreadthFirst,
                EdgeMode::Undirected,
                &mut visited,
            ) {
                members.insert(letter.symbol);
                combined_weight += letter.weight as u64;
            }

            islands.push(Island {
                members,
                combined_weight,
            });
        }

        debug_assert_eq!(visited.len(), self.nodes.len());
        islands.sort_unstable_by(|a, b| a.members.first().cmp(&b.members.first()));
        tracing::debug!("letter graph partitioned into {} islands", islands.len());
        islands
    }

    /// The island containing `symbol`.
    pub fn island_of(&self, symbol: char) -> Option<&Island> {
        self.island_index(symbol).map(|i| &self.islands()[i])
    }

    /// Index into [`islands`](Self::islands) of the island containing `symbol`.
    pub fn island_index(&self, symbol: char) -> Option<usize> {
        self.islands().iter().position(|island| island.contains(symbol))
    }

    /// Tier of `island`, or `None` when its weight is not a known total.
    #[inline]
    pub fn tier_of(&self, island: &Island) -> Option<Tier> {
        island.tier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::small_graph;
    use els_types::LetterSymbol;

    fn members(graph: &LetterGraph) -> Vec<Vec<char>> {
        graph
            .islands()
            .iter()
            .map(|i| i.members.iter().copied().collect())
            .collect()
    }

    #[test]
    fn islands_partition_every_node() {
        for graph in [small_graph(), LetterGraph::hebrew()] {
            let mut seen = BTreeSet::new();
            for island in graph.islands() {
                for &m in &island.members {
                    assert!(seen.insert(m), "{m} appears in two islands");
                }
            }
            let all: BTreeSet<char> = graph.symbols().iter().map(|l| l.symbol).collect();
            assert_eq!(seen, all);
        }
    }

    #[test]
    fn islands_are_idempotent() {
        let graph = small_graph();
        let first = members(&graph);
        let second = members(&graph);
        assert_eq!(first, second);

        let rebuilt = small_graph();
        assert_eq!(first, members(&rebuilt));
    }

    #[test]
    fn two_cycle_shares_an_island() {
        let graph = small_graph();
        assert_eq!(members(&graph), vec![vec!['w'], vec!['x', 'y'], vec!['z']]);
        assert_eq!(graph.island_of('x'), graph.island_of('y'));
        assert_ne!(graph.island_of('x'), graph.island_of('z'));
    }

    #[test]
    fn combined_weights() {
        let graph = small_graph();
        let xy = graph.island_of('x').unwrap();
        assert_eq!(xy.combined_weight, 3);
        assert_eq!(graph.island_of('w').unwrap().combined_weight, 4);
        assert!(graph.island_of('q').is_none());
    }

    #[test]
    fn undirected_partition_joins_shared_targets() {
        // a → c and b → c: no path between a and b, same island.
        let graph = LetterGraph::load(vec![
            LetterSymbol::new('a', 1, "c"),
            LetterSymbol::new('b', 2, "c"),
            LetterSymbol::new('c', 3, ""),
            LetterSymbol::new('d', 4, ""),
        ])
        .unwrap();
        assert_eq!(members(&graph), vec![vec!['a', 'b', 'c'], vec!['d']]);
    }

    #[test]
    fn hebrew_alphabet_is_one_complete_island() {
        let graph = LetterGraph::hebrew();
        assert_eq!(graph.islands().len(), 1);
        let island = &graph.islands()[0];
        assert_eq!(island.members.len(), 22);
        assert_eq!(graph.tier_of(island), Some(Tier::Complete));
    }

    #[test]
    fn tier_groups_as_separate_islands() {
        // Mothers, doubles and simples each chained into their own component.
        let chain = |letters: &[(char, u32)]| -> Vec<LetterSymbol> {
            letters
                .iter()
                .enumerate()
                .map(|(i, &(c, w))| {
                    let next = letters.get(i + 1).map(|(n, _)| n.to_string()).unwrap_or_default();
                    LetterSymbol::new(c, w, &next)
                })
                .collect()
        };
        let mut symbols = chain(&[('א', 1), ('מ', 40), ('ש', 300)]);
        symbols.extend(chain(&[
            ('ב', 2),
            ('ג', 3),
            ('ד', 4),
            ('כ', 20),
            ('פ', 80),
            ('ר', 200),
            ('ת', 400),
        ]));
        let graph = LetterGraph::load(symbols).unwrap();

        let tiers: Vec<Option<Tier>> = graph.islands().iter().map(|i| graph.tier_of(i)).collect();
        assert_eq!(tiers, vec![Some(Tier::Mothers), Some(Tier::Doubles)]);
    }

    #[test]
    fn unmatched_weight_has_no_tier() {
        let graph = small_graph();
        for island in graph.islands() {
            assert_eq!(graph.tier_of(island), None);
        }
    }
}
