use std::fmt;

use dfamin_dfa::StateIndex;

use crate::Partition;

/// Defines a partition based on an explicit indexing of elements to their block
/// number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPartition {
    partition: Vec<usize>,

    num_of_blocks: usize,
}

impl IndexedPartition {
    /// Create a new partition where all elements are in a single block.
    pub fn new(num_of_elements: usize) -> IndexedPartition {
        IndexedPartition {
            partition: vec![0; num_of_elements],
            num_of_blocks: 1,
        }
    }

    /// Sets the block number of the given element
    pub fn set_block(&mut self, element_index: usize, block_number: usize) {
        // This assumes that the block numbers are dense, otherwise it
        // overestimates the number of blocks.
        self.num_of_blocks = self.num_of_blocks.max(block_number + 1);

        self.partition[element_index] = block_number;
    }

    /// Returns the elements of every block, ordered by block number. The
    /// elements of a block are sorted.
    pub fn blocks(&self) -> Vec<Vec<StateIndex>> {
        let mut blocks = vec![Vec::new(); self.num_of_blocks];
        for (element_index, block_number) in self.partition.iter().enumerate() {
            blocks[*block_number].push(element_index);
        }

        blocks
    }
}

impl fmt::Display for IndexedPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;

        let mut first = true;
        for block in self.blocks().iter().filter(|block| !block.is_empty()) {
            if !first {
                write!(f, ", ")?;
            }

            write!(f, "{{")?;
            for (index, element) in block.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", element)?;
            }
            write!(f, "}}")?;

            first = false;
        }

        write!(f, " }}")
    }
}

impl Partition for IndexedPartition {
    fn block_number(&self, state_index: StateIndex) -> usize {
        self.partition[state_index]
    }

    fn num_of_blocks(&self) -> usize {
        self.num_of_blocks
    }
}
