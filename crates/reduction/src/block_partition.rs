//!
//! A partition that keeps track of a number of blocks within a fixed set of
//! states, where every block is a contiguous range of a permutation of the
//! states.
//!
//! The invariants are that the union of all blocks is the original set, and
//! that each block contains distinct elements.

use std::fmt;

use dfamin_dfa::StateIndex;

use crate::Partition;

/// A partition that supports splitting a block in time proportional to the
/// number of elements that are split off.
///
/// Elements are first marked, which moves them to the back of their block,
/// after which [BlockPartition::split_marked] turns the marked range into a
/// new block.
pub struct BlockPartition {
    /// A permutation of the elements, every block is a range of this vector.
    elements: Vec<StateIndex>,

    /// The position of every element in `elements`.
    element_offset: Vec<usize>,

    /// The block that contains every element.
    element_to_block: Vec<usize>,

    blocks: Vec<Block>,
}

impl BlockPartition {
    /// Create an initial partition where all the states are in a single block.
    pub fn new(num_of_elements: usize) -> BlockPartition {
        debug_assert!(num_of_elements > 0, "Cannot partition the empty set");

        BlockPartition {
            elements: (0..num_of_elements).collect(),
            element_offset: (0..num_of_elements).collect(),
            element_to_block: vec![0; num_of_elements],
            blocks: vec![Block::new(0, num_of_elements)],
        }
    }

    /// Marks the given element, returns false when it was already marked.
    pub fn mark_element(&mut self, element: StateIndex) -> bool {
        let block = &mut self.blocks[self.element_to_block[element]];
        let offset = self.element_offset[element];

        if offset >= block.marked_split {
            return false;
        }

        // Swap the element to the beginning of the marked range at the back of the block.
        block.marked_split -= 1;
        let other = self.elements[block.marked_split];
        self.elements.swap(offset, block.marked_split);
        self.element_offset[other] = offset;
        self.element_offset[element] = block.marked_split;

        true
    }

    /// Returns the number of marked elements in the given block.
    pub fn num_of_marked(&self, block_index: usize) -> usize {
        self.blocks[block_index].end - self.blocks[block_index].marked_split
    }

    /// Splits the marked elements of the given block into a new block and
    /// returns its index. Afterwards no element of either block is marked.
    ///
    /// Returns None when either no element or all elements were marked, in
    /// which case the block is left unchanged.
    pub fn split_marked(&mut self, block_index: usize) -> Option<usize> {
        let block = self.blocks[block_index];

        if block.marked_split == block.begin || block.marked_split == block.end {
            self.blocks[block_index].marked_split = block.end;
            return None;
        }

        let new_block_index = self.blocks.len();
        self.blocks.push(Block::new(block.marked_split, block.end));
        self.blocks[block_index] = Block::new(block.begin, block.marked_split);

        for element in &self.elements[block.marked_split..block.end] {
            self.element_to_block[*element] = new_block_index;
        }

        debug_assert!(
            self.is_consistent(),
            "After splitting the partition {:?} is inconsistent",
            self
        );

        Some(new_block_index)
    }

    /// Split the given block into two separate blocks based on the splitter
    /// predicate, where the elements that satisfy the predicate form the new
    /// block.
    pub fn split(
        &mut self,
        block_index: usize,
        mut splitter: impl FnMut(StateIndex) -> bool,
    ) -> Option<usize> {
        let block = self.blocks[block_index];
        for offset in block.begin..block.end {
            let element = self.elements[offset];
            if splitter(element) {
                self.mark_element(element);
            }
        }

        self.split_marked(block_index)
    }

    /// Returns the elements of the given block.
    pub fn block_elements(&self, block_index: usize) -> &[StateIndex] {
        let block = &self.blocks[block_index];
        &self.elements[block.begin..block.end]
    }

    /// Returns the number of elements in the given block.
    pub fn block_len(&self, block_index: usize) -> usize {
        self.blocks[block_index].len()
    }

    /// Returns true iff the invariants of a partition hold
    fn is_consistent(&self) -> bool {
        let mut marked = vec![false; self.elements.len()];

        for (block_index, block) in self.blocks.iter().enumerate() {
            for offset in block.begin..block.end {
                let element = self.elements[offset];
                if marked[element]
                    || self.element_to_block[element] != block_index
                    || self.element_offset[element] != offset
                {
                    // This element belongs to another block, or the indices are stale.
                    return false;
                }

                marked[element] = true;
            }
        }

        // Check that every element belongs to a block.
        !marked.contains(&false)
    }
}

impl Partition for BlockPartition {
    fn block_number(&self, state_index: StateIndex) -> usize {
        self.element_to_block[state_index]
    }

    fn num_of_blocks(&self) -> usize {
        self.blocks.len()
    }
}

impl fmt::Debug for BlockPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;

        for (block_index, block) in self.blocks.iter().enumerate() {
            if block_index > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{{")?;
            for (index, element) in self.elements[block.begin..block.end].iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", element)?;
            }
            write!(f, "}}")?;
        }

        write!(f, "}}")
    }
}

/// A block is the range [begin, end) of the elements, where the range
/// [marked_split, end) contains the marked elements.
#[derive(Clone, Copy, Debug)]
struct Block {
    begin: usize,
    marked_split: usize,
    end: usize,
}

impl Block {
    fn new(begin: usize, end: usize) -> Block {
        Block {
            begin,
            marked_split: end,
            end,
        }
    }

    /// Returns the number of elements in the block.
    fn len(&self) -> usize {
        debug_assert!(self.begin <= self.end, "The range of this block is incorrect");

        self.end - self.begin
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_block_partition() {
        let mut partition = BlockPartition::new(10);

        assert_eq!(partition.split(0, |element| element < 3), Some(1));

        // The new block only has elements that satisfy the predicate.
        for element in partition.block_elements(1) {
            assert!(*element < 3);
            assert_eq!(partition.block_number(*element), 1);
        }

        for element in partition.block_elements(0) {
            assert!(*element >= 3);
        }

        assert_eq!(partition.split(0, |element| element < 7), Some(2));
        for element in partition.block_elements(2) {
            assert!(*element >= 3 && *element < 7);
        }

        for element in partition.block_elements(0) {
            assert!(*element >= 7);
        }

        assert_eq!(partition.num_of_blocks(), 3);
        assert_eq!(partition.block_len(0), 3);
        assert_eq!(partition.block_len(1), 3);
        assert_eq!(partition.block_len(2), 4);
    }

    #[test]
    fn test_split_all_or_nothing() {
        let mut partition = BlockPartition::new(4);

        // Splitting off all elements does not introduce an empty block.
        assert_eq!(partition.split(0, |_| true), None);
        assert_eq!(partition.split(0, |_| false), None);
        assert_eq!(partition.num_of_blocks(), 1);
        assert_eq!(partition.num_of_marked(0), 0);
    }

    #[test]
    fn test_mark_element() {
        let mut partition = BlockPartition::new(5);

        assert!(partition.mark_element(2));
        assert!(!partition.mark_element(2));
        assert!(partition.mark_element(0));
        assert_eq!(partition.num_of_marked(0), 2);

        let new_block = partition.split_marked(0).unwrap();
        let mut elements = partition.block_elements(new_block).to_vec();
        elements.sort();
        assert_eq!(elements, vec![0, 2]);
        assert_eq!(partition.num_of_marked(0), 0);
        assert_eq!(partition.num_of_marked(new_block), 0);
    }
}
