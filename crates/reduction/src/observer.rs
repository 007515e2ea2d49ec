/// Receives the progress of a refinement algorithm.
///
/// Round zero is the initial partition that separates accepting from
/// non-accepting states. The quadratic algorithms report once per round, the
/// Hopcroft algorithm once per split.
pub trait RefinementObserver {
    fn refined(&mut self, round: usize, num_of_blocks: usize);
}

/// Ignores the progress.
impl RefinementObserver for () {
    fn refined(&mut self, _round: usize, _num_of_blocks: usize) {}
}

/// Records the number of blocks after every round.
impl RefinementObserver for Vec<usize> {
    fn refined(&mut self, _round: usize, num_of_blocks: usize) {
        self.push(num_of_blocks);
    }
}
