//!
//! Utilities shared by the tools, currently the measurement of the time
//! spent in the phases of a run.
//!

#![forbid(unsafe_code)]

mod timing;

pub use timing::*;
