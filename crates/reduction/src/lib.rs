//!
//! A crate containing the partition refinement algorithms that minimize
//! deterministic finite automata, and the quotient construction that turns a
//! partition into the minimized automaton.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod block_partition;
mod comparison;
mod equivalence;
mod hopcroft;
mod incoming_transitions;
mod indexed_partition;
mod minimize;
mod moore;
mod naive;
mod observer;
mod partition;
mod quotient;
mod refinement;

pub use block_partition::*;
pub use comparison::*;
pub use equivalence::*;
pub use hopcroft::*;
pub use incoming_transitions::*;
pub use indexed_partition::*;
pub use minimize::*;
pub use moore::*;
pub use naive::*;
pub use observer::*;
pub use partition::*;
pub use quotient::*;
pub use refinement::*;
