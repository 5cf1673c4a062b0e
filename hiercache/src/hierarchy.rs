use log::debug;
use crate::cache::{CacheTrait, GenericCacheLevel};
use crate::config::LayeredCacheConfig;
use crate::error::Result;
use crate::stats::{AccessKind, CacheResult};

/// An ordered chain of cache levels, L1 first
///
/// A miss at one level is forwarded to the next, a hit stops the walk. The chain depth is the
/// configured level count, so the walk is a plain loop
pub struct CacheHierarchy {
    levels: Vec<GenericCacheLevel>,
}

impl CacheHierarchy {
    /// Builds one level per configuration entry, in the order given
    ///
    /// # Arguments
    ///
    /// * `config`: A configuration sorted by level, validated again here
    /// * `seed`: Base seed for random levels. Level N uses `seed + N - 1`, so two random levels
    /// don't draw the same victims
    ///
    /// returns: Result<CacheHierarchy, SimError>
    pub fn new(config: &LayeredCacheConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let levels = config
            .caches
            .iter()
            .map(|level| {
                debug!(
                    "Building L{}: {} sets, {} byte blocks, {}-way, {}",
                    level.level, level.set_count, level.block_size, level.associativity, level.replacement_policy
                );
                let level_seed = seed.map(|seed| seed.wrapping_add(level.level.saturating_sub(1)));
                GenericCacheLevel::from_config(level, level_seed)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels })
    }

    /// Accesses an address at L1, cascading down on each miss
    ///
    /// returns: the classification at every level the address reached, top first
    pub fn access(&mut self, address: u32) -> Vec<AccessKind> {
        let mut kinds = Vec::with_capacity(self.levels.len());
        self.access_with(address, |kind| kinds.push(kind));
        kinds
    }

    #[inline]
    fn access_with(&mut self, address: u32, mut on_level: impl FnMut(AccessKind)) {
        for level in self.levels.iter_mut() {
            let kind = level.access(address);
            on_level(kind);
            if kind.is_hit() {
                break;
            }
        }
    }

    /// Replays a whole trace through the hierarchy, then collects every level's counters
    pub fn run_trace(&mut self, addresses: &[u32]) -> Vec<CacheResult> {
        for &address in addresses {
            self.access_with(address, |_| {});
        }
        self.results()
    }

    pub fn levels(&self) -> &[GenericCacheLevel] {
        &self.levels
    }

    /// The counters of every level, in ascending level order
    pub fn results(&self) -> Vec<CacheResult> {
        self.levels.iter().map(|level| level.result().clone()).collect()
    }
}
