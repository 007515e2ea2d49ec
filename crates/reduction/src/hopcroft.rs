use log::debug;
use log::trace;
use rustc_hash::FxHashSet;

use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;
use dfamin_dfa::StateIndex;
use dfamin_dfa::SymbolIndex;

use crate::is_stable_partition;
use crate::BlockPartition;
use crate::IncomingTransitions;
use crate::Partition;
use crate::RefinementObserver;

/// Computes the coarsest stable partition of a complete automaton using
/// Hopcroft's algorithm.
///
/// Starting from the split into accepting and non-accepting states, a work
/// list of splitters (block, symbol) is processed. Every block containing
/// both states that move into the splitter on the symbol and states that do
/// not is split, and the smaller half is added to the work list. Every split
/// increases the number of blocks by one, and the algorithm takes
/// O(m n log n) time for m symbols and n states.
pub fn hopcroft_partition(
    dfa: &Dfa,
    observer: &mut impl RefinementObserver,
) -> Result<BlockPartition, DfaError> {
    dfa.check_complete()?;
    trace!("{:?}", dfa);

    let incoming = IncomingTransitions::new(dfa);

    // Split the non-accepting states, in block 0, from the accepting states.
    let mut partition = BlockPartition::new(dfa.num_of_states());
    partition.split(0, |state_index| dfa.is_accepting(state_index));
    observer.refined(0, partition.num_of_blocks());
    debug!("Round 0, found {} blocks", partition.num_of_blocks());

    // The pending splitters, and a set to check membership.
    let mut work: Vec<(usize, SymbolIndex)> = Vec::new();
    let mut in_work: FxHashSet<(usize, SymbolIndex)> = FxHashSet::default();

    if partition.num_of_blocks() == 2 {
        let smallest_block = if partition.block_len(1) < partition.block_len(0) { 1 } else { 0 };
        for symbol_index in dfa.iter_symbols() {
            work.push((smallest_block, symbol_index));
            in_work.insert((smallest_block, symbol_index));
        }
    }

    // Reused buffers for the states of the splitter and the blocks that contain marked states.
    let mut splitter_states: Vec<StateIndex> = Vec::new();
    let mut touched_blocks: Vec<usize> = Vec::new();

    let mut round = 0;
    while let Some((splitter, symbol_index)) = work.pop() {
        in_work.remove(&(splitter, symbol_index));
        trace!("Splitter block {splitter} on symbol {}", dfa.symbol_name(symbol_index));

        // The splitter itself can be split below, so its states are copied first.
        splitter_states.clear();
        splitter_states.extend_from_slice(partition.block_elements(splitter));

        // Mark all states that move into the splitter.
        for to in &splitter_states {
            for from in incoming.predecessors(*to, symbol_index) {
                if partition.mark_element(from) {
                    let block = partition.block_number(from);
                    if partition.num_of_marked(block) == 1 {
                        touched_blocks.push(block);
                    }
                }
            }
        }

        for block in touched_blocks.drain(..) {
            if let Some(new_block) = partition.split_marked(block) {
                round += 1;
                observer.refined(round, partition.num_of_blocks());
                debug!(
                    "Round {round}, split block {new_block} off {block}, found {} blocks",
                    partition.num_of_blocks()
                );

                for other_symbol in dfa.iter_symbols() {
                    if in_work.contains(&(block, other_symbol)) {
                        // Both halves are still pending.
                        work.push((new_block, other_symbol));
                        in_work.insert((new_block, other_symbol));
                    } else {
                        // Process the smaller half.
                        let smaller =
                            if partition.block_len(new_block) <= partition.block_len(block) {
                                new_block
                            } else {
                                block
                            };

                        work.push((smaller, other_symbol));
                        in_work.insert((smaller, other_symbol));
                    }
                }
            }
        }

        debug_assert!(
            round < dfa.num_of_states(),
            "There can never be more splits than number of states"
        );
    }

    debug_assert!(
        is_stable_partition(dfa, &partition),
        "The resulting partition is not stable for {:?}",
        dfa
    );

    trace!("Final partition {:?}", partition);
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use dfamin_dfa::random_dfa;
    use test_log::test;

    use crate::moore_partition;

    use super::*;

    #[test]
    fn test_random_hopcroft_partition() {
        for _ in 0..20 {
            let dfa = random_dfa(20, 3);
            let partition = hopcroft_partition(&dfa, &mut ()).unwrap();

            assert!(
                is_stable_partition(&dfa, &partition),
                "The resulting partition is not stable for {:?}",
                dfa
            );

            // The coarsest stable partition is unique.
            let moore = moore_partition(&dfa, &mut ()).unwrap();
            assert_eq!(partition.num_of_blocks(), moore.num_of_blocks());
            for state_index in dfa.iter_states() {
                for other_index in dfa.iter_states() {
                    assert_eq!(
                        partition.block_number(state_index) == partition.block_number(other_index),
                        moore.block_number(state_index) == moore.block_number(other_index)
                    );
                }
            }
        }
    }

    #[test]
    fn test_hopcroft_splits_are_strictly_monotone() {
        for _ in 0..20 {
            let dfa = random_dfa(15, 2);
            let mut block_counts: Vec<usize> = Vec::new();
            hopcroft_partition(&dfa, &mut block_counts).unwrap();

            assert!(block_counts.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(block_counts.len() <= dfa.num_of_states());
        }
    }

    #[test]
    fn test_single_block() {
        let dfa = Dfa::new(
            0,
            vec!["p".into(), "q".into()],
            vec!["a".into()],
            vec![Some(1), Some(0)],
            vec![true, true],
        );

        let mut block_counts: Vec<usize> = Vec::new();
        let partition = hopcroft_partition(&dfa, &mut block_counts).unwrap();
        assert_eq!(partition.num_of_blocks(), 1);
        assert_eq!(block_counts, vec![1]);
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
            hopcroft_partition(&dfa, &mut ()),
            Err(DfaError::UndefinedTransition { state, symbol }) if state == "q" && symbol == "b"
        ));
    }
}
