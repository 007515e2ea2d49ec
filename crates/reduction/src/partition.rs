use dfamin_dfa::StateIndex;

/// A trait for partition refinement algorithms that expose the block number
/// for every state. Can be used to compute the quotient automaton.
///
/// The invariants are that the union of all blocks is the original set, and
/// that each block contains distinct elements.
pub trait Partition {
    /// Returns the block number for the given state.
    fn block_number(&self, state_index: StateIndex) -> usize;

    /// Returns the number of blocks in the partition.
    fn num_of_blocks(&self) -> usize;
}
