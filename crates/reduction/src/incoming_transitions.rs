use dfamin_dfa::Dfa;
use dfamin_dfa::StateIndex;
use dfamin_dfa::SymbolIndex;

/// A struct containing the incoming transitions for every state, which are
/// stored as (symbol, from) pairs sorted by symbol.
pub struct IncomingTransitions {
    incoming_transitions: Vec<(SymbolIndex, StateIndex)>,
    state2incoming: Vec<TransitionIndex>,
}

#[derive(Default, Clone)]
struct TransitionIndex {
    start: usize,
    end: usize,
}

impl IncomingTransitions {
    pub fn new(dfa: &Dfa) -> IncomingTransitions {
        let mut incoming_transitions: Vec<(SymbolIndex, StateIndex)> =
            vec![(0, 0); dfa.num_of_transitions()];
        let mut state2incoming: Vec<TransitionIndex> =
            vec![TransitionIndex::default(); dfa.num_of_states()];

        // Compute the number of incoming transitions for each state.
        for state_index in dfa.iter_states() {
            for (_, to) in dfa.outgoing_transitions(state_index) {
                state2incoming[to].end += 1;
            }
        }

        // Fold the counts in state2incoming. Temporarily mixing up the data
        // structure such that after placing the transitions below the counts
        // will be correct.
        state2incoming.iter_mut().fold(0, |count, index| {
            let end = count + index.end;
            index.start = end;
            index.end = end;
            end
        });

        for state_index in dfa.iter_states() {
            for (symbol_index, to) in dfa.outgoing_transitions(state_index) {
                let index = &mut state2incoming[to];
                index.start -= 1;
                incoming_transitions[index.start] = (symbol_index, state_index);
            }
        }

        for index in &state2incoming {
            // Sort the incoming transitions such that the predecessors for one symbol are adjacent.
            incoming_transitions[index.start..index.end].sort_unstable();
        }

        IncomingTransitions {
            incoming_transitions,
            state2incoming,
        }
    }

    /// Returns the states that reach the given state with the given symbol.
    pub fn predecessors(
        &self,
        state_index: StateIndex,
        symbol_index: SymbolIndex,
    ) -> impl Iterator<Item = StateIndex> + '_ {
        let index = &self.state2incoming[state_index];
        let slice = &self.incoming_transitions[index.start..index.end];

        let begin = slice.partition_point(|(symbol, _)| *symbol < symbol_index);
        let end = slice.partition_point(|(symbol, _)| *symbol <= symbol_index);
        slice[begin..end].iter().map(|(_, from)| *from)
    }
}

#[cfg(test)]
mod tests {
    use dfamin_dfa::random_partial_dfa;
    use test_log::test;

    use super::*;

    #[test]
    fn test_incoming_transitions() {
        let dfa = random_partial_dfa(10, 3, 0.7);
        let incoming = IncomingTransitions::new(&dfa);

        // Every outgoing transition is found as incoming transition, and vice versa.
        let mut num_of_incoming = 0;
        for state_index in dfa.iter_states() {
            for symbol_index in dfa.iter_symbols() {
                for from in incoming.predecessors(state_index, symbol_index) {
                    assert_eq!(dfa.successor(from, symbol_index), Some(state_index));
                    num_of_incoming += 1;
                }
            }
        }

        assert_eq!(num_of_incoming, dfa.num_of_transitions());
    }
}
