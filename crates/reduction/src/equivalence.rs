use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;
use dfamin_dfa::StateIndex;

use crate::moore_partition;
use crate::Partition;

/// Returns true iff the two states have the same acceptance status, and for
/// every symbol their successors lie in the same block of the partition.
///
/// An undefined transition only agrees with another undefined transition.
pub fn equivalent(
    dfa: &Dfa,
    partition: &impl Partition,
    state_index: StateIndex,
    other_index: StateIndex,
) -> bool {
    if dfa.is_accepting(state_index) != dfa.is_accepting(other_index) {
        return false;
    }

    dfa.iter_symbols().all(|symbol_index| {
        let block = dfa
            .successor(state_index, symbol_index)
            .map(|to| partition.block_number(to));
        let other_block = dfa
            .successor(other_index, symbol_index)
            .map(|to| partition.block_number(to));

        block == other_block
    })
}

/// Returns true iff every state is equivalent to the other states in its
/// block with respect to the partition itself, i.e., no block can be split
/// any further.
pub fn is_stable_partition(dfa: &Dfa, partition: &impl Partition) -> bool {
    let mut representative: Vec<Option<StateIndex>> = vec![None; partition.num_of_blocks()];

    for state_index in dfa.iter_states() {
        let block = partition.block_number(state_index);

        match representative[block] {
            None => representative[block] = Some(state_index),
            Some(representative_index) => {
                if !equivalent(dfa, partition, state_index, representative_index) {
                    return false;
                }
            }
        }
    }

    true
}

/// Returns true iff no two distinct states of the given complete automaton
/// are language equivalent.
pub fn is_minimal(dfa: &Dfa) -> Result<bool, DfaError> {
    let partition = moore_partition(dfa, &mut ())?;

    for state_index in dfa.iter_states() {
        for other_index in (state_index + 1)..dfa.num_of_states() {
            if equivalent(dfa, &partition, state_index, other_index) {
                return Ok(false);
            }
        }
    }

    Ok(true)
}
