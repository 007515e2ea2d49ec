use log::trace;
use rustc_hash::FxHashMap;

use crate::Dfa;
use crate::DfaError;
use crate::StateIndex;
use crate::SymbolIndex;

/// Incrementally constructs a [Dfa] from named states and symbols.
///
/// Adding a state or symbol that already exists returns the existing index.
/// The invariants of the automaton are only checked by [DfaBuilder::finish].
#[derive(Default, Debug)]
pub struct DfaBuilder {
    state_names: Vec<String>,
    state_indices: FxHashMap<String, StateIndex>,

    symbols: Vec<String>,
    symbol_indices: FxHashMap<String, SymbolIndex>,

    transitions: Vec<(String, String, String)>,
    initial_state: Option<String>,
    accepting: Vec<String>,
}

impl DfaBuilder {
    pub fn new() -> DfaBuilder {
        DfaBuilder::default()
    }

    /// Adds a state with the given name and returns its index.
    pub fn add_state(&mut self, name: impl Into<String>) -> StateIndex {
        let name = name.into();
        if let Some(index) = self.state_indices.get(&name) {
            return *index;
        }

        let index = self.state_names.len();
        self.state_indices.insert(name.clone(), index);
        self.state_names.push(name);
        index
    }

    /// Adds a symbol to the alphabet and returns its index.
    pub fn add_symbol(&mut self, name: impl Into<String>) -> SymbolIndex {
        let name = name.into();
        if let Some(index) = self.symbol_indices.get(&name) {
            return *index;
        }

        let index = self.symbols.len();
        self.symbol_indices.insert(name.clone(), index);
        self.symbols.push(name);
        index
    }

    /// Adds the transition from --[symbol]-> to.
    pub fn add_transition(
        &mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
        to: impl Into<String>,
    ) {
        self.transitions.push((from.into(), symbol.into(), to.into()));
    }

    /// Sets the initial state, replacing the previous one.
    pub fn set_initial(&mut self, name: impl Into<String>) {
        self.initial_state = Some(name.into());
    }

    /// Marks the given state as accepting.
    pub fn add_accepting(&mut self, name: impl Into<String>) {
        self.accepting.push(name.into());
    }

    /// Returns the automaton described by this builder, or
    /// [DfaError::InvalidAutomaton] when one of its invariants is violated.
    pub fn finish(self) -> Result<Dfa, DfaError> {
        let state = |name: &str| {
            self.state_indices
                .get(name)
                .copied()
                .ok_or_else(|| {
                    DfaError::InvalidAutomaton(format!("state {name} has not been added"))
                })
        };

        let initial_name = self
            .initial_state
            .as_deref()
            .ok_or_else(|| DfaError::InvalidAutomaton("there is no initial state".into()))?;
        let initial_state = state(initial_name)?;

        let mut accepting = vec![false; self.state_names.len()];
        for name in &self.accepting {
            accepting[state(name)?] = true;
        }

        let num_of_symbols = self.symbols.len();
        let mut transitions: Vec<Option<StateIndex>> =
            vec![None; self.state_names.len() * num_of_symbols];
        for (from_name, symbol_name, to_name) in &self.transitions {
            let from = state(from_name)?;
            let to = state(to_name)?;
            let symbol = self
                .symbol_indices
                .get(symbol_name)
                .copied()
                .ok_or_else(|| {
                    DfaError::InvalidAutomaton(format!(
                        "symbol {symbol_name} is not in the alphabet"
                    ))
                })?;

            let entry = &mut transitions[from * num_of_symbols + symbol];
            match entry {
                Some(existing) if *existing != to => {
                    return Err(DfaError::InvalidAutomaton(format!(
                        "state {from_name} has multiple transitions on symbol {symbol_name}"
                    )));
                }
                _ => *entry = Some(to),
            }

            trace!("Added transition {from_name} --[{symbol_name}]-> {to_name}");
        }

        let dfa = Dfa::new(initial_state, self.state_names, self.symbols, transitions, accepting);
        dfa.validate()?;
        Ok(dfa)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_builder() {
        let mut builder = DfaBuilder::new();
        assert_eq!(builder.add_state("A"), 0);
        assert_eq!(builder.add_state("B"), 1);
        assert_eq!(builder.add_state("A"), 0);
        builder.add_symbol("0");
        builder.add_symbol("1");
        builder.set_initial("A");
        builder.add_accepting("B");
        builder.add_transition("A", "0", "B");
        builder.add_transition("A", "0", "B");
        builder.add_transition("B", "1", "A");

        let dfa = builder.finish().unwrap();
        assert_eq!(dfa.num_of_states(), 2);
        assert_eq!(dfa.num_of_symbols(), 2);
        assert_eq!(dfa.num_of_transitions(), 2);
        assert!(!dfa.is_complete());
        assert!(dfa.accepts([0, 1, 0]));
    }

    #[test]
    fn test_builder_errors() {
        let mut builder = DfaBuilder::new();
        builder.add_state("A");
        builder.add_symbol("a");
        assert!(
            matches!(builder.finish(), Err(DfaError::InvalidAutomaton(_))),
            "Missing initial state"
        );

        let mut builder = DfaBuilder::new();
        builder.add_state("A");
        builder.add_symbol("a");
        builder.set_initial("A");
        builder.add_transition("A", "a", "B");
        assert!(
            matches!(builder.finish(), Err(DfaError::InvalidAutomaton(_))),
            "Dangling transition endpoint"
        );

        let mut builder = DfaBuilder::new();
        builder.add_state("A");
        builder.set_initial("A");
        assert!(matches!(builder.finish(), Err(DfaError::InvalidAutomaton(_))), "Empty alphabet");

        let mut builder = DfaBuilder::new();
        builder.add_state("A");
        builder.add_state("B");
        builder.add_symbol("a");
        builder.set_initial("A");
        builder.add_transition("A", "a", "A");
        builder.add_transition("A", "a", "B");
        assert!(
            matches!(builder.finish(), Err(DfaError::InvalidAutomaton(_))),
            "Nondeterministic transition"
        );
    }
}
