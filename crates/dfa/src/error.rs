use thiserror::Error;

/// The errors that can occur when constructing, inspecting or comparing
/// deterministic finite automata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DfaError {
    #[error("Invalid automaton: {0}")]
    InvalidAutomaton(String),

    #[error("Undefined transition from state {state} on symbol {symbol}, the automaton is partial")]
    UndefinedTransition { state: String, symbol: String },

    #[error("Cannot compare automata over different alphabets {left:?} and {right:?}")]
    IncompatibleAutomatonForComparison { left: Vec<String>, right: Vec<String> },
}
