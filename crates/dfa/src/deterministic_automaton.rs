use std::fmt;

use log::debug;

use crate::DfaError;

/// The index for a state.
pub type StateIndex = usize;

/// The index type for a symbol of the alphabet.
pub type SymbolIndex = usize;

/// The name given to the absorbing state introduced by [Dfa::complete].
const SINK_NAME: &str = "error";

/// Represents a deterministic finite automaton with a (possibly partial)
/// transition function.
///
/// States and symbols are identified by their index, the names are only
/// relevant for presentation and for comparing automata.
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa {
    state_names: Vec<String>,
    symbols: Vec<String>,

    /// The transition function stored row-major, the entry for (s, a) is at
    /// index `s * symbols.len() + a`.
    transitions: Vec<Option<StateIndex>>,

    initial_state: StateIndex,
    accepting: Vec<bool>,

    num_of_transitions: usize,
}

impl Dfa {
    /// Creates a new automaton from its index based representation.
    ///
    /// No validation is performed, use [Dfa::validate] to check that the
    /// invariants of a deterministic automaton hold.
    pub fn new(
        initial_state: StateIndex,
        state_names: Vec<String>,
        symbols: Vec<String>,
        transitions: Vec<Option<StateIndex>>,
        accepting: Vec<bool>,
    ) -> Dfa {
        debug_assert_eq!(
            transitions.len(),
            state_names.len() * symbols.len(),
            "The transition table should have an entry for every state and symbol"
        );

        let num_of_transitions = transitions.iter().filter(|to| to.is_some()).count();

        Dfa {
            state_names,
            symbols,
            transitions,
            initial_state,
            accepting,
            num_of_transitions,
        }
    }

    /// Checks the structural invariants: a non-empty set of states and
    /// alphabet, an existing initial state, and transitions that only refer
    /// to existing states.
    pub fn validate(&self) -> Result<(), DfaError> {
        if self.state_names.is_empty() {
            return Err(DfaError::InvalidAutomaton("the set of states is empty".into()));
        }

        if self.symbols.is_empty() {
            return Err(DfaError::InvalidAutomaton("the alphabet is empty".into()));
        }

        if self.initial_state >= self.num_of_states() {
            return Err(DfaError::InvalidAutomaton(format!(
                "the initial state {} does not exist",
                self.initial_state
            )));
        }

        if self.accepting.len() != self.num_of_states()
            || self.transitions.len() != self.num_of_states() * self.num_of_symbols()
        {
            return Err(DfaError::InvalidAutomaton(
                "the acceptance or transition table does not match the number of states".into(),
            ));
        }

        if let Some(to) = self
            .transitions
            .iter()
            .flatten()
            .find(|to| **to >= self.num_of_states())
        {
            return Err(DfaError::InvalidAutomaton(format!(
                "a transition leads to unknown state {to}"
            )));
        }

        Ok(())
    }

    /// Returns the index of the initial state.
    pub fn initial_state(&self) -> StateIndex {
        self.initial_state
    }

    /// Returns true iff the given state is accepting.
    pub fn is_accepting(&self, state_index: StateIndex) -> bool {
        self.accepting[state_index]
    }

    /// Returns the number of accepting states.
    pub fn num_of_accepting_states(&self) -> usize {
        self.accepting.iter().filter(|accepting| **accepting).count()
    }

    /// Returns the target of the transition from the given state on the given
    /// symbol, if it is defined.
    pub fn successor(
        &self,
        state_index: StateIndex,
        symbol_index: SymbolIndex,
    ) -> Option<StateIndex> {
        self.transitions[state_index * self.symbols.len() + symbol_index]
    }

    /// Returns the target of the transition from the given state on the given
    /// symbol, failing when it is undefined.
    pub fn transition(
        &self,
        state_index: StateIndex,
        symbol_index: SymbolIndex,
    ) -> Result<StateIndex, DfaError> {
        self.successor(state_index, symbol_index)
            .ok_or_else(|| DfaError::UndefinedTransition {
                state: self.state_names[state_index].clone(),
                symbol: self.symbols[symbol_index].clone(),
            })
    }

    /// Returns the defined outgoing transitions of the given state.
    pub fn outgoing_transitions(
        &self,
        state_index: StateIndex,
    ) -> impl Iterator<Item = (SymbolIndex, StateIndex)> + '_ {
        let num_of_symbols = self.symbols.len();
        let start = state_index * num_of_symbols;
        let row = &self.transitions[start..start + num_of_symbols];
        row.iter()
            .enumerate()
            .filter_map(|(symbol_index, to)| to.map(|to| (symbol_index, to)))
    }

    /// Iterate over all state indices of the automaton.
    pub fn iter_states(&self) -> impl Iterator<Item = StateIndex> {
        0..self.state_names.len()
    }

    /// Iterate over all symbol indices of the alphabet.
    pub fn iter_symbols(&self) -> impl Iterator<Item = SymbolIndex> {
        0..self.symbols.len()
    }

    /// Returns the number of states.
    pub fn num_of_states(&self) -> usize {
        self.state_names.len()
    }

    /// Returns the number of symbols in the alphabet.
    pub fn num_of_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the number of defined transitions.
    pub fn num_of_transitions(&self) -> usize {
        self.num_of_transitions
    }

    /// Returns the name of the given state.
    pub fn state_name(&self, state_index: StateIndex) -> &str {
        &self.state_names[state_index]
    }

    /// Returns the names of all the states.
    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    /// Returns the name of the given symbol.
    pub fn symbol_name(&self, symbol_index: SymbolIndex) -> &str {
        &self.symbols[symbol_index]
    }

    /// Returns the alphabet.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the index of the state with the given name.
    pub fn state_index(&self, name: &str) -> Option<StateIndex> {
        self.state_names.iter().position(|other| other == name)
    }

    /// Returns the index of the symbol with the given name.
    pub fn symbol_index(&self, name: &str) -> Option<SymbolIndex> {
        self.symbols.iter().position(|other| other == name)
    }

    /// Returns true iff the transition function is total.
    pub fn is_complete(&self) -> bool {
        self.num_of_transitions == self.transitions.len()
    }

    /// Fails with [DfaError::UndefinedTransition] for the first missing
    /// transition when the automaton is not complete.
    pub fn check_complete(&self) -> Result<(), DfaError> {
        for state_index in self.iter_states() {
            for symbol_index in self.iter_symbols() {
                self.transition(state_index, symbol_index)?;
            }
        }

        Ok(())
    }

    /// Returns true iff the given word, a sequence of symbol indices, is
    /// accepted. A word that reaches an undefined transition is rejected.
    pub fn accepts(&self, word: impl IntoIterator<Item = SymbolIndex>) -> bool {
        let mut current = self.initial_state;
        for symbol_index in word {
            match self.successor(current, symbol_index) {
                Some(to) => current = to,
                None => return false,
            }
        }

        self.accepting[current]
    }

    /// Makes the transition function total by introducing a single
    /// non-accepting absorbing state that is the target of every missing
    /// transition. Returns the index of the introduced state.
    ///
    /// Does nothing when the automaton is already complete, so calling this
    /// twice never introduces a second absorbing state.
    pub fn complete(&mut self) -> Option<StateIndex> {
        if self.is_complete() {
            return None;
        }

        // Find a fresh name for the absorbing state.
        let mut name = SINK_NAME.to_string();
        while self.state_index(&name).is_some() {
            name.push('\'');
        }

        let sink = self.state_names.len();
        self.state_names.push(name);
        self.accepting.push(false);
        self.transitions.extend(std::iter::repeat(Some(sink)).take(self.symbols.len()));

        for to in self.transitions.iter_mut().filter(|to| to.is_none()) {
            *to = Some(sink);
        }

        debug!("Completed the automaton with absorbing state {}", self.state_names[sink]);
        self.num_of_transitions = self.transitions.len();
        Some(sink)
    }

    /// Retains only the states for which `keep` holds, renumbering the
    /// remaining states while preserving their relative order.
    ///
    /// Transitions into removed states are removed as well. The initial state
    /// must be kept.
    pub(crate) fn retain_states(&mut self, keep: &[bool]) {
        debug_assert!(keep[self.initial_state], "The initial state cannot be removed");

        let mut mapping: Vec<Option<StateIndex>> = vec![None; self.num_of_states()];
        let mut next_index = 0;
        for (state_index, keep) in keep.iter().enumerate() {
            if *keep {
                mapping[state_index] = Some(next_index);
                next_index += 1;
            }
        }

        let num_of_symbols = self.num_of_symbols();
        let mut state_names = Vec::with_capacity(next_index);
        let mut accepting = Vec::with_capacity(next_index);
        let mut transitions = Vec::with_capacity(next_index * num_of_symbols);

        for state_index in self.iter_states().filter(|state_index| keep[*state_index]) {
            state_names.push(std::mem::take(&mut self.state_names[state_index]));
            accepting.push(self.accepting[state_index]);

            for symbol_index in 0..num_of_symbols {
                transitions.push(
                    self.successor(state_index, symbol_index)
                        .and_then(|to| mapping[to]),
                );
            }
        }

        *self = Dfa::new(
            mapping[self.initial_state].unwrap_or_default(),
            state_names,
            std::mem::take(&mut self.symbols),
            transitions,
            accepting,
        );
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Print some information about the automaton.
        writeln!(f, "Number of states: {}", self.num_of_states())?;
        writeln!(f, "Number of accepting states: {}", self.num_of_accepting_states())?;
        writeln!(f, "Number of symbols: {}", self.num_of_symbols())?;
        write!(f, "Number of transitions: {}", self.num_of_transitions)
    }
}

impl fmt::Debug for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self)?;
        writeln!(f, "Initial state: {}", self.state_names[self.initial_state])?;

        let accepting: Vec<&str> = self
            .iter_states()
            .filter(|state_index| self.accepting[*state_index])
            .map(|state_index| self.state_name(state_index))
            .collect();
        writeln!(f, "Accepting states: {:?}", accepting)?;

        for state_index in self.iter_states() {
            for (symbol_index, to) in self.outgoing_transitions(state_index) {
                writeln!(
                    f,
                    "{} --[{}]-> {}",
                    self.state_names[state_index], self.symbols[symbol_index], self.state_names[to]
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    /// A partial automaton over {a, b} that accepts the words a(ba)*.
    fn alternating() -> Dfa {
        Dfa::new(
            0,
            vec!["p".into(), "q".into()],
            vec!["a".into(), "b".into()],
            vec![Some(1), None, None, Some(0)],
            vec![false, true],
        )
    }

    #[test]
    fn test_accepts() {
        let dfa = alternating();
        assert!(dfa.validate().is_ok());

        assert!(dfa.accepts([0]));
        assert!(dfa.accepts([0, 1, 0]));
        assert!(!dfa.accepts([]));
        assert!(!dfa.accepts([0, 0]));
        assert!(!dfa.accepts([1]));
    }

    #[test]
    fn test_undefined_transition() {
        let dfa = alternating();

        assert_eq!(dfa.transition(0, 0), Ok(1));
        assert_eq!(
            dfa.transition(0, 1),
            Err(DfaError::UndefinedTransition {
                state: "p".into(),
                symbol: "b".into()
            })
        );
        assert!(dfa.check_complete().is_err());
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut dfa = alternating();
        assert!(!dfa.is_complete());

        let sink = dfa.complete().expect("A missing transition requires an absorbing state");
        assert_eq!(dfa.num_of_states(), 3);
        assert_eq!(dfa.state_name(sink), "error");
        assert!(!dfa.is_accepting(sink));
        assert!(dfa.is_complete());
        assert!(dfa.check_complete().is_ok());

        for symbol_index in dfa.iter_symbols() {
            assert_eq!(dfa.successor(sink, symbol_index), Some(sink));
        }

        // The language does not change by completing the automaton.
        assert!(dfa.accepts([0, 1, 0]));
        assert!(!dfa.accepts([0, 0, 1]));

        assert_eq!(dfa.complete(), None);
        assert_eq!(dfa.num_of_states(), 3);
    }

    #[test]
    fn test_complete_fresh_name() {
        let mut dfa = Dfa::new(
            0,
            vec!["error".into()],
            vec!["a".into(), "b".into()],
            vec![Some(0), None],
            vec![true],
        );

        let sink = dfa.complete().unwrap();
        assert_eq!(dfa.state_name(sink), "error'");
    }

    #[test]
    fn test_validate() {
        let no_initial = Dfa::new(
            2,
            vec!["p".into(), "q".into()],
            vec!["a".into()],
            vec![Some(1), Some(0)],
            vec![false, true],
        );
        assert!(matches!(no_initial.validate(), Err(DfaError::InvalidAutomaton(_))));

        let dangling = Dfa::new(0, vec!["p".into()], vec!["a".into()], vec![Some(3)], vec![false]);
        assert!(matches!(dangling.validate(), Err(DfaError::InvalidAutomaton(_))));

        let no_symbols = Dfa::new(0, vec!["p".into()], vec![], vec![], vec![false]);
        assert!(matches!(no_symbols.validate(), Err(DfaError::InvalidAutomaton(_))));
    }
}
