use rand::Rng;

use crate::Dfa;
use crate::StateIndex;

/// Generates a complete automaton with the desired number of states and
/// symbols, where every state is accepting with probability one half.
pub fn random_dfa(num_of_states: usize, num_of_symbols: usize) -> Dfa {
    random_partial_dfa(num_of_states, num_of_symbols, 1.0)
}

/// Generates an automaton with the desired number of states and symbols,
/// where every transition is defined with the given probability.
pub fn random_partial_dfa(
    num_of_states: usize,
    num_of_symbols: usize,
    transition_probability: f64,
) -> Dfa {
    let mut rng = rand::rng();

    let state_names: Vec<String> = (0..num_of_states).map(|index| format!("s{index}")).collect();
    let symbols: Vec<String> = (0..num_of_symbols).map(symbol_name).collect();

    let mut transitions: Vec<Option<StateIndex>> =
        Vec::with_capacity(num_of_states * num_of_symbols);
    for _ in 0..num_of_states * num_of_symbols {
        if rng.random_bool(transition_probability) {
            transitions.push(Some(rng.random_range(0..num_of_states)));
        } else {
            transitions.push(None);
        }
    }

    let accepting = (0..num_of_states).map(|_| rng.random_bool(0.5)).collect();

    Dfa::new(0, state_names, symbols, transitions, accepting)
}

/// Introduce lower case letters for the symbols, and numbered symbols after
/// the alphabet is exhausted.
fn symbol_name(index: usize) -> String {
    match char::from_digit(index as u32 + 10, 36) {
        Some(letter) if index < 26 => letter.to_string(),
        _ => format!("a{index}"),
    }
}
