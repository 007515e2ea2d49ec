use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashSet;

use dfamin_dfa::Dfa;
use dfamin_dfa::StateIndex;

use crate::Partition;

/// Returns a new automaton based on the given partition.
///
/// All states in a single block are replaced by a single state, named by the
/// sorted names of the original states joined with commas. When this name is
/// already taken, it is primed until it is unique. The states of the quotient
/// are ordered by their name, such that equal partitions result in equal
/// automata. Empty blocks are dropped.
///
/// The transitions of a block are taken from an arbitrary representative, so
/// the partition must be stable for the result to be meaningful.
pub fn quotient_dfa(dfa: &Dfa, partition: &impl Partition) -> Dfa {
    let start = std::time::Instant::now();

    let mut members: Vec<Vec<StateIndex>> = vec![Vec::new(); partition.num_of_blocks()];
    for state_index in dfa.iter_states() {
        members[partition.block_number(state_index)].push(state_index);
    }

    // Blocks are ordered by name, and by their smallest state when names coincide.
    let mut blocks: Vec<(String, Vec<StateIndex>)> = members
        .into_iter()
        .filter(|states| !states.is_empty())
        .map(|states| (block_name(dfa, &states), states))
        .sorted_by(|(name, states), (other_name, other_states)| {
            name.cmp(other_name).then(states[0].cmp(&other_states[0]))
        })
        .collect();

    // A state named "a,b" and the block {a, b} would get the same name, so
    // later duplicates are primed until the name is unique.
    let mut used_names: FxHashSet<String> = FxHashSet::default();
    for (name, _) in &mut blocks {
        while !used_names.insert(name.clone()) {
            name.push('\'');
        }
    }
    blocks.sort_by(|(name, _), (other_name, _)| name.cmp(other_name));

    // The quotient state for every block number.
    let mut quotient_state: Vec<StateIndex> = vec![0; partition.num_of_blocks()];
    for (index, (_, states)) in blocks.iter().enumerate() {
        quotient_state[partition.block_number(states[0])] = index;
    }

    let mut transitions: Vec<Option<StateIndex>> =
        Vec::with_capacity(blocks.len() * dfa.num_of_symbols());
    let mut accepting: Vec<bool> = Vec::with_capacity(blocks.len());

    for (_, states) in &blocks {
        let representative = states[0];

        debug_assert!(
            states
                .iter()
                .all(|state_index| {
                    dfa.is_accepting(*state_index) == dfa.is_accepting(representative)
                }),
            "Block {:?} contains both accepting and non-accepting states",
            states
        );
        accepting.push(states.iter().any(|state_index| dfa.is_accepting(*state_index)));

        for symbol_index in dfa.iter_symbols() {
            let to_block = dfa
                .successor(representative, symbol_index)
                .map(|to| partition.block_number(to));

            debug_assert!(
                states.iter().all(|state_index| dfa
                    .successor(*state_index, symbol_index)
                    .map(|to| partition.block_number(to))
                    == to_block),
                "The states in block {:?} disagree on symbol {}",
                states,
                dfa.symbol_name(symbol_index)
            );

            transitions.push(to_block.map(|block| quotient_state[block]));
        }
    }

    let state_names = blocks.into_iter().map(|(name, _)| name).collect();
    let initial_state = quotient_state[partition.block_number(dfa.initial_state())];

    debug!("Time quotient_dfa: {:.3}s", start.elapsed().as_secs_f64());
    Dfa::new(initial_state, state_names, dfa.symbols().to_vec(), transitions, accepting)
}

/// Returns the name of a quotient state, the sorted names of its states joined by commas.
fn block_name(dfa: &Dfa, states: &[StateIndex]) -> String {
    states
        .iter()
        .map(|state_index| dfa.state_name(*state_index))
        .sorted()
        .join(",")
}
