use fastrand::Rng;

/// One storage slot of a set
///
/// `stamp` is the level's logical clock value the policy last wrote: the last access time for
/// LRU, the insertion time for FIFO, and unused by Random
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Line {
    pub valid: bool,
    pub tag: u32,
    pub stamp: u64,
}

/// A generic trait for replacement policies. Used to parameterise a CacheLevel.
///
/// The level owns the logical clock and passes the next tick in, so policies which don't need
/// time don't have to track it
pub trait ReplacementPolicy {
    /// Whether the policy reads the clock. The level skips ticking it when this is false
    const USES_CLOCK: bool;

    /// Updates the policy when a valid line is hit
    ///
    /// Not applicable for some policies, a default which does nothing is provided
    #[inline]
    fn update_on_hit(&mut self, _line: &mut Line, _now: u64) {}

    /// Stamps a line which was just filled or overwritten
    #[inline]
    fn update_on_insert(&mut self, line: &mut Line, now: u64) {
        line.stamp = now;
    }

    /// Picks the way to evict from a set in which every line is valid
    ///
    /// # Arguments
    ///
    /// * `set`: The lines of the target set, all valid
    ///
    /// returns: usize, an index into `set`
    fn select_victim(&mut self, set: &[Line]) -> usize;
}

/// Used for levels with an associativity of 1. There is only ever one candidate, so nothing is
/// tracked and the first line is always the victim
#[derive(Debug, Default)]
pub struct NoPolicy;

impl ReplacementPolicy for NoPolicy {
    const USES_CLOCK: bool = false;

    #[inline]
    fn update_on_insert(&mut self, _line: &mut Line, _now: u64) {}

    #[inline]
    fn select_victim(&mut self, _set: &[Line]) -> usize {
        0
    }
}

/// Uniformly random replacement
///
/// The generator can be seeded so a run is reproducible
#[derive(Debug)]
pub struct Random {
    rng: Rng,
}

impl Random {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self { rng }
    }
}

impl ReplacementPolicy for Random {
    const USES_CLOCK: bool = false;

    #[inline]
    fn update_on_insert(&mut self, _line: &mut Line, _now: u64) {}

    #[inline]
    fn select_victim(&mut self, set: &[Line]) -> usize {
        self.rng.usize(..set.len())
    }
}

/// Least Recently Used replacement policy
///
/// Lines are stamped on every hit and insert, the victim is the line with the oldest stamp
#[derive(Debug, Default)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    const USES_CLOCK: bool = true;

    #[inline]
    fn update_on_hit(&mut self, line: &mut Line, now: u64) {
        line.stamp = now;
    }

    #[inline]
    fn select_victim(&mut self, set: &[Line]) -> usize {
        oldest_stamp(set)
    }
}

/// First In First Out replacement policy
///
/// Lines are only stamped when inserted, hits leave the order untouched
#[derive(Debug, Default)]
pub struct FirstInFirstOut;

impl ReplacementPolicy for FirstInFirstOut {
    const USES_CLOCK: bool = true;

    #[inline]
    fn select_victim(&mut self, set: &[Line]) -> usize {
        oldest_stamp(set)
    }
}

/// Index of the smallest stamp, the first one wins a tie
#[inline]
fn oldest_stamp(set: &[Line]) -> usize {
    // Manual loop, the same shape as the hit scan so both get unrolled
    let mut min_value = u64::MAX;
    let mut min_index = 0;
    let mut index = 0;
    while index < set.len() {
        if set[index].stamp < min_value {
            min_value = set[index].stamp;
            min_index = index;
        }
        index += 1;
    }
    min_index
}
