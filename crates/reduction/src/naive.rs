use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;

use crate::equivalent;
use crate::refine_until_stable;
use crate::IndexedPartition;
use crate::RefinementObserver;

/// Computes the coarsest stable partition of a complete automaton by testing
/// every pair of states within a block for equivalence.
///
/// The states of a block are grouped by the transitive closure of the pairwise
/// equivalence, so the result does not depend on the order in which the pairs
/// are tested. Takes O(n^2) equivalence tests per round.
pub fn naive_partition(
    dfa: &Dfa,
    observer: &mut impl RefinementObserver,
) -> Result<IndexedPartition, DfaError> {
    refine_until_stable(dfa, observer, |block, partition, next_partition, next_block_number| {
        let mut sets = DisjointSets::new(block.len());

        for (index, state_index) in block.iter().enumerate() {
            for (other, other_index) in block.iter().enumerate().skip(index + 1) {
                if sets.find(index) != sets.find(other)
                    && equivalent(dfa, partition, *state_index, *other_index)
                {
                    sets.union(index, other);
                }
            }
        }

        // Every class of the closure becomes a new block.
        let mut block_of_root: Vec<Option<usize>> = vec![None; block.len()];
        for (index, state_index) in block.iter().enumerate() {
            let block_number = *block_of_root[sets.find(index)].get_or_insert_with(|| {
                *next_block_number += 1;
                *next_block_number - 1
            });

            next_partition.set_block(*state_index, block_number);
        }
    })
}

/// A union-find structure over the indices 0..n with path compression.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(num_of_elements: usize) -> DisjointSets {
        DisjointSets {
            parent: (0..num_of_elements).collect(),
        }
    }

    /// Returns the root of the set containing the given element.
    fn find(&mut self, element: usize) -> usize {
        let mut root = element;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Compress the path to the root.
        let mut current = element;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Merges the sets containing the given elements.
    fn union(&mut self, element: usize, other: usize) {
        let root = self.find(element);
        let other_root = self.find(other);
        self.parent[other_root.max(root)] = other_root.min(root);
    }
}

#[cfg(test)]
mod tests {
    use dfamin_dfa::random_dfa;
    use test_log::test;

    use crate::is_stable_partition;
    use crate::Partition;

    use super::*;

    /// Returns the states that are in the same block as the given state.
    fn group_of(partition: &IndexedPartition, state_index: usize) -> Vec<usize> {
        partition.blocks()[partition.block_number(state_index)].clone()
    }

    #[test]
    fn test_random_naive_partition() {
        for _ in 0..20 {
            let dfa = random_dfa(10, 3);
            let partition = naive_partition(&dfa, &mut ()).unwrap();

            assert!(
                is_stable_partition(&dfa, &partition),
                "The resulting partition is not stable for {:?}",
                dfa
            );
        }
    }

    #[test]
    fn test_non_adjacent_equivalent_states() {
        // States 0 and 2 are equivalent, but state 1 in between is not. Only
        // comparing adjacent states would keep 0 and 2 apart.
        let dfa = Dfa::new(
            0,
            vec!["x".into(), "y".into(), "z".into(), "f".into()],
            vec!["a".into()],
            vec![Some(3), Some(1), Some(3), Some(3)],
            vec![false, false, false, true],
        );

        let partition = naive_partition(&dfa, &mut ()).unwrap();
        assert_eq!(partition.num_of_blocks(), 3);
        assert_eq!(group_of(&partition, 0), vec![0, 2]);
        assert_eq!(group_of(&partition, 1), vec![1]);
    }

    #[test]
    fn test_incomplete_automaton() {
        let dfa = Dfa::new(0, vec!["p".into()], vec!["a".into()], vec![None], vec![true]);

        assert!(matches!(
            naive_partition(&dfa, &mut ()),
            Err(DfaError::UndefinedTransition { .. })
        ));
    }

    #[test]
    fn test_disjoint_sets() {
        let mut sets = DisjointSets::new(5);
        sets.union(3, 1);
        sets.union(4, 3);

        assert_eq!(sets.find(4), sets.find(1));
        assert_ne!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(2), sets.find(4));
    }
}
