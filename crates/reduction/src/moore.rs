use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;
use dfamin_dfa::StateIndex;

use crate::equivalent;
use crate::refine_until_stable;
use crate::IndexedPartition;
use crate::RefinementObserver;

/// Computes the coarsest stable partition of a complete automaton using
/// Moore's algorithm.
///
/// Every round splits each block by repeatedly selecting a representative
/// and separating the states that are equivalent to it. Takes O(n * k)
/// equivalence tests per round, where k is the number of blocks.
pub fn moore_partition(
    dfa: &Dfa,
    observer: &mut impl RefinementObserver,
) -> Result<IndexedPartition, DfaError> {
    refine_until_stable(dfa, observer, |block, partition, next_partition, next_block_number| {
        // The representative state of every new block split from this block.
        let mut representatives: Vec<(StateIndex, usize)> = Vec::new();

        for state_index in block {
            let existing = representatives
                .iter()
                .find(|(representative, _)| {
                    equivalent(dfa, partition, *representative, *state_index)
                })
                .map(|(_, block_number)| *block_number);

            match existing {
                Some(block_number) => next_partition.set_block(*state_index, block_number),
                None => {
                    representatives.push((*state_index, *next_block_number));
                    next_partition.set_block(*state_index, *next_block_number);
                    *next_block_number += 1;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use dfamin_dfa::random_dfa;
    use test_log::test;

    use crate::is_stable_partition;
    use crate::naive_partition;
    use crate::Partition;

    use super::*;

    #[test]
    fn test_random_moore_partition() {
        for _ in 0..20 {
            let dfa = random_dfa(10, 3);
            let partition = moore_partition(&dfa, &mut ()).unwrap();

            assert!(
                is_stable_partition(&dfa, &partition),
                "The resulting partition is not stable for {:?}",
                dfa
            );

            // Both quadratic algorithms compute the same grouping.
            let naive = naive_partition(&dfa, &mut ()).unwrap();
            assert_eq!(partition.num_of_blocks(), naive.num_of_blocks());
            for state_index in dfa.iter_states() {
                for other_index in dfa.iter_states() {
                    assert_eq!(
                        partition.block_number(state_index) == partition.block_number(other_index),
                        naive.block_number(state_index) == naive.block_number(other_index)
                    );
                }
            }
        }
    }

    #[test]
    fn test_moore_rounds_are_monotone() {
        for _ in 0..20 {
            let dfa = random_dfa(15, 2);
            let mut block_counts: Vec<usize> = Vec::new();
            moore_partition(&dfa, &mut block_counts).unwrap();

            assert!(block_counts.len() >= 2, "There is at least one refinement round");
            assert!(block_counts.windows(2).all(|pair| pair[0] <= pair[1]));

            // The last round detects the fixed point.
            let last = block_counts.len() - 1;
            assert_eq!(block_counts[last], block_counts[last - 1]);
        }
    }

    #[test]
    fn test_incomplete_automaton() {
        let dfa = Dfa::new(
            0,
            vec!["p".into(), "q".into()],
            vec!["a".into(), "b".into()],
            vec![Some(1), Some(0), Some(1), None],
            vec![false, true],
        );

        assert!(matches!(
            moore_partition(&dfa, &mut ()),
            Err(DfaError::UndefinedTransition { state, symbol }) if state == "q" && symbol == "b"
        ));
    }
}
