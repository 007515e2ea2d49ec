//!
//! A crate containing IO related functionality. This includes the reading and
//! writing of deterministic automata in the textual .dfa format and in the
//! XML format of JFLAP (.jff).
//!

mod line_iterator;

pub mod io_dfa;
pub mod io_jff;
