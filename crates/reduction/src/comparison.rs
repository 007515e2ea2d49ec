use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;
use dfamin_dfa::StateIndex;
use dfamin_dfa::SymbolIndex;

/// Returns for every symbol of `left` the index of the same symbol in
/// `right`, or an error when the alphabets are not equal.
fn symbol_mapping(left: &Dfa, right: &Dfa) -> Result<Vec<SymbolIndex>, DfaError> {
    let incompatible = || DfaError::IncompatibleAutomatonForComparison {
        left: left.symbols().to_vec(),
        right: right.symbols().to_vec(),
    };

    if left.num_of_symbols() != right.num_of_symbols() {
        return Err(incompatible());
    }

    left.iter_symbols()
        .map(|symbol_index| {
            right
                .symbol_index(left.symbol_name(symbol_index))
                .ok_or_else(incompatible)
        })
        .collect()
}

/// Returns true iff there is a bijection between the states of both automata
/// that preserves the initial state, acceptance and the transitions. State
/// names are ignored, symbols are matched by name.
///
/// The bijection is constructed from the initial states, so states that are
/// unreachable in either automaton are never matched.
pub fn is_isomorphic(left: &Dfa, right: &Dfa) -> Result<bool, DfaError> {
    let symbols = symbol_mapping(left, right)?;

    if left.num_of_states() != right.num_of_states() {
        return Ok(false);
    }

    // The bijection between left and right states.
    let mut left_to_right: Vec<Option<StateIndex>> = vec![None; left.num_of_states()];
    let mut right_to_left: Vec<Option<StateIndex>> = vec![None; right.num_of_states()];

    let mut queue: VecDeque<(StateIndex, StateIndex)> = VecDeque::new();
    left_to_right[left.initial_state()] = Some(right.initial_state());
    right_to_left[right.initial_state()] = Some(left.initial_state());
    queue.push_back((left.initial_state(), right.initial_state()));

    while let Some((left_index, right_index)) = queue.pop_front() {
        if left.is_accepting(left_index) != right.is_accepting(right_index) {
            return Ok(false);
        }

        for symbol_index in left.iter_symbols() {
            match (
                left.successor(left_index, symbol_index),
                right.successor(right_index, symbols[symbol_index]),
            ) {
                (None, None) => {}
                (Some(left_to), Some(right_to)) => match (
                    left_to_right[left_to],
                    right_to_left[right_to],
                ) {
                    (None, None) => {
                        left_to_right[left_to] = Some(right_to);
                        right_to_left[right_to] = Some(left_to);
                        queue.push_back((left_to, right_to));
                    }
                    (Some(mapped), Some(_)) if mapped == right_to => {}
                    _ => return Ok(false),
                },
                _ => return Ok(false),
            }
        }
    }

    Ok(left_to_right.iter().all(|mapped| mapped.is_some()))
}

/// Returns true iff both automata agree on the acceptance of every word up to
/// the given length. Symbols are matched by name, and an undefined transition
/// rejects the word.
pub fn language_equivalent_up_to(
    left: &Dfa,
    right: &Dfa,
    max_length: usize,
) -> Result<bool, DfaError> {
    let symbols = symbol_mapping(left, right)?;

    // Explore the pairs of states reached by the same word, where None
    // represents having taken an undefined transition.
    let accepts = |dfa: &Dfa, state: Option<StateIndex>| {
        state.is_some_and(|state_index| dfa.is_accepting(state_index))
    };

    let initial = (Some(left.initial_state()), Some(right.initial_state()));
    let mut visited: FxHashSet<(Option<StateIndex>, Option<StateIndex>)> = FxHashSet::default();
    let mut queue: VecDeque<((Option<StateIndex>, Option<StateIndex>), usize)> = VecDeque::new();
    visited.insert(initial);
    queue.push_back((initial, 0));

    while let Some(((left_state, right_state), length)) = queue.pop_front() {
        if accepts(left, left_state) != accepts(right, right_state) {
            return Ok(false);
        }

        if length == max_length {
            continue;
        }

        for symbol_index in left.iter_symbols() {
            let next = (
                left_state.and_then(|state_index| left.successor(state_index, symbol_index)),
                right_state
                    .and_then(|state_index| right.successor(state_index, symbols[symbol_index])),
            );

            // A pair that was reached by a shorter word has already been explored further.
            if visited.insert(next) {
                queue.push_back((next, length + 1));
            }
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn cycle(names: [&str; 3], symbols: [&str; 2]) -> Dfa {
        Dfa::new(
            0,
            names.iter().map(|name| name.to_string()).collect(),
            symbols.iter().map(|name| name.to_string()).collect(),
            vec![Some(1), Some(0), Some(2), Some(1), Some(0), Some(2)],
            vec![false, false, true],
        )
    }

    #[test]
    fn test_is_isomorphic() {
        let dfa = cycle(["p", "q", "r"], ["a", "b"]);
        assert!(is_isomorphic(&dfa, &dfa).unwrap());

        // Renaming states does not matter.
        assert!(is_isomorphic(&dfa, &cycle(["x", "y", "z"], ["a", "b"])).unwrap());

        // Swapping the symbols changes the structure.
        assert!(!is_isomorphic(&dfa, &cycle(["p", "q", "r"], ["b", "a"])).unwrap());
        assert!(language_equivalent_up_to(&dfa, &dfa, 5).unwrap());
        assert!(!language_equivalent_up_to(&dfa, &cycle(["p", "q", "r"], ["b", "a"]), 5).unwrap());
    }

    #[test]
    fn test_incompatible_alphabets() {
        let dfa = cycle(["p", "q", "r"], ["a", "b"]);
        let other = cycle(["p", "q", "r"], ["a", "c"]);

        assert!(matches!(
            is_isomorphic(&dfa, &other),
            Err(DfaError::IncompatibleAutomatonForComparison { .. })
        ));
        assert!(matches!(
            language_equivalent_up_to(&dfa, &other, 3),
            Err(DfaError::IncompatibleAutomatonForComparison { .. })
        ));
    }
}
