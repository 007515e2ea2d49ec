use std::collections::VecDeque;

use log::debug;
use log::trace;

use crate::Dfa;
use crate::StateIndex;

/// Returns for every state whether it is reachable from the initial state,
/// computed by a breadth first search over all symbols.
pub fn reachable_states(dfa: &Dfa) -> Vec<bool> {
    let mut visited = vec![false; dfa.num_of_states()];
    let mut queue: VecDeque<StateIndex> = VecDeque::new();

    visited[dfa.initial_state()] = true;
    queue.push_back(dfa.initial_state());

    while let Some(state_index) = queue.pop_front() {
        for (_, to) in dfa.outgoing_transitions(state_index) {
            if !visited[to] {
                trace!("State {} is reachable", dfa.state_name(to));
                visited[to] = true;
                queue.push_back(to);
            }
        }
    }

    visited
}

impl Dfa {
    /// Removes every state, and the transitions from and to it, that cannot be
    /// reached from the initial state. Returns the number of removed states.
    pub fn remove_unreachable_states(&mut self) -> usize {
        let reachable = reachable_states(self);
        let num_of_unreachable = reachable.iter().filter(|reachable| !**reachable).count();

        if num_of_unreachable > 0 {
            self.retain_states(&reachable);
        }

        debug!("Removed {num_of_unreachable} unreachable states");
        num_of_unreachable
    }
}
