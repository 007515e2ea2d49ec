use std::fmt;

use log::debug;

use dfamin_dfa::Dfa;
use dfamin_dfa::DfaError;

use crate::hopcroft_partition;
use crate::moore_partition;
use crate::naive_partition;
use crate::quotient_dfa;
use crate::RefinementObserver;

/// The partition refinement algorithms that can be used for minimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Pairwise equivalence testing within every block, O(n^2) per round.
    Naive,
    /// Moore's representative based splitting, O(n^2) in total.
    Moore,
    /// Hopcroft's work list based splitting, O(n log n).
    Hopcroft,
}

impl Algorithm {
    /// All the available algorithms.
    pub const ALL: [Algorithm; 3] = [Algorithm::Naive, Algorithm::Moore, Algorithm::Hopcroft];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Naive => write!(f, "naive"),
            Algorithm::Moore => write!(f, "moore"),
            Algorithm::Hopcroft => write!(f, "hopcroft"),
        }
    }
}

/// Returns the minimal automaton that accepts the same language as the given
/// automaton, using the given refinement algorithm.
///
/// Unreachable states are removed first. When all remaining states are
/// accepting, or none of them are, the pruned automaton is returned
/// unchanged. Otherwise an automaton with undefined transitions is completed
/// with an absorbing state before the refinement, so the result is complete.
pub fn minimize(dfa: &Dfa, algorithm: Algorithm) -> Result<Dfa, DfaError> {
    minimize_with_observer(dfa, algorithm, &mut ())
}

/// Same as [minimize], but reports the progress of the refinement to the observer.
pub fn minimize_with_observer(
    dfa: &Dfa,
    algorithm: Algorithm,
    observer: &mut impl RefinementObserver,
) -> Result<Dfa, DfaError> {
    dfa.validate()?;

    let mut dfa = dfa.clone();
    dfa.remove_unreachable_states();

    let num_of_accepting = dfa.num_of_accepting_states();
    if num_of_accepting == 0 || num_of_accepting == dfa.num_of_states() {
        debug!("All states have the same acceptance status, no refinement is needed");
        return Ok(dfa);
    }

    dfa.complete();

    debug!("Minimizing with the {algorithm} algorithm");
    let result = match algorithm {
        Algorithm::Naive => quotient_dfa(&dfa, &naive_partition(&dfa, observer)?),
        Algorithm::Moore => quotient_dfa(&dfa, &moore_partition(&dfa, observer)?),
        Algorithm::Hopcroft => quotient_dfa(&dfa, &hopcroft_partition(&dfa, observer)?),
    };

    debug!("Reduced {} states to {} states", dfa.num_of_states(), result.num_of_states());
    Ok(result)
}

/// Minimizes the automaton by pairwise equivalence testing.
pub fn minimize_naive(dfa: &Dfa) -> Result<Dfa, DfaError> {
    minimize(dfa, Algorithm::Naive)
}

/// Minimizes the automaton using Moore's algorithm.
pub fn minimize_moore(dfa: &Dfa) -> Result<Dfa, DfaError> {
    minimize(dfa, Algorithm::Moore)
}

/// Minimizes the automaton using Hopcroft's algorithm.
pub fn minimize_hopcroft(dfa: &Dfa) -> Result<Dfa, DfaError> {
    minimize(dfa, Algorithm::Hopcroft)
}
