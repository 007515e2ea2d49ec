use log::debug;
use log::trace;

use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;
use dfamin_dfa::StateIndex;

use crate::IndexedPartition;
use crate::Partition;
use crate::RefinementObserver;

/// Returns the coarsest partition consistent with acceptance, consisting of
/// at most two blocks: the accepting and the non-accepting states. Empty
/// blocks are omitted and block numbers are assigned in the order of the
/// states.
pub fn acceptance_partition(dfa: &Dfa) -> IndexedPartition {
    let mut partition = IndexedPartition::new(dfa.num_of_states());

    // The block number for non-accepting and accepting states respectively.
    let mut block_numbers: [Option<usize>; 2] = [None, None];
    let mut next_block_number = 0;

    for state_index in dfa.iter_states() {
        let accepting = dfa.is_accepting(state_index) as usize;
        let block_number = block_numbers[accepting].get_or_insert_with(|| {
            next_block_number += 1;
            next_block_number - 1
        });

        partition.set_block(state_index, *block_number);
    }

    partition
}

/// General round based refinement shared by the quadratic algorithms.
///
/// Every round builds a fresh partition from the previous one, which is never
/// modified. The `split_block` function receives a block of the previous
/// partition and must assign all its states to new blocks, numbered from the
/// given counter. The refinement stops as soon as a round does not increase
/// the number of blocks.
pub(crate) fn refine_until_stable<F>(
    dfa: &Dfa,
    observer: &mut impl RefinementObserver,
    mut split_block: F,
) -> Result<IndexedPartition, DfaError>
where
    F: FnMut(&[StateIndex], &IndexedPartition, &mut IndexedPartition, &mut usize),
{
    dfa.check_complete()?;
    trace!("{:?}", dfa);

    let mut partition = acceptance_partition(dfa);
    observer.refined(0, partition.num_of_blocks());
    debug!("Round 0, found {} blocks", partition.num_of_blocks());

    let mut round = 0;
    loop {
        round += 1;

        let mut next_partition = IndexedPartition::new(dfa.num_of_states());
        let mut next_block_number = 0;

        for block in partition.blocks().iter().filter(|block| !block.is_empty()) {
            split_block(block.as_slice(), &partition, &mut next_partition, &mut next_block_number);
        }

        observer.refined(round, next_partition.num_of_blocks());
        debug!("Round {round}, found {} blocks", next_partition.num_of_blocks());

        debug_assert!(
            next_partition.num_of_blocks() >= partition.num_of_blocks(),
            "Refinement can never merge blocks"
        );
        debug_assert!(
            round <= dfa.num_of_states().max(2),
            "There are at most as many rounds as states, but at least two for stability"
        );

        if next_partition.num_of_blocks() == partition.num_of_blocks() {
            break;
        }

        partition = next_partition;
    }

    trace!("Final partition {partition}");
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_acceptance_partition() {
        let dfa = Dfa::new(
            0,
            vec!["p".into(), "q".into(), "r".into()],
            vec!["a".into()],
            vec![Some(1), Some(2), Some(0)],
            vec![true, false, true],
        );

        let partition = acceptance_partition(&dfa);
        assert_eq!(partition.num_of_blocks(), 2);
        assert_eq!(partition.blocks(), vec![vec![0, 2], vec![1]]);

        let single = Dfa::new(0, vec!["p".into()], vec!["a".into()], vec![Some(0)], vec![false]);
        assert_eq!(acceptance_partition(&single).num_of_blocks(), 1);
    }
}
