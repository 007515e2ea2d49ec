//!
//! A crate containing the deterministic finite automaton model, together
//! with the operations that prepare an automaton for minimization.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod builder;
mod deterministic_automaton;
mod error;
mod random_dfa;
mod reachability;

pub use builder::*;
pub use deterministic_automaton::*;
pub use error::*;
pub use random_dfa::*;
pub use reachability::*;
