use crate::address::AddressDecoder;
use crate::cache::CacheTrait;
use crate::config::CacheLevelConfig;
use crate::error::{Result, SimError};
use crate::stats::{AccessKind, CacheResult};

/// A single direct mapped level, used when it is the whole hierarchy
///
/// Each set holds exactly one line, so there is no policy and no clock: a set is either empty,
/// holding the tag, or holding another tag. Produces the same counters as a [`CacheLevel`] with
/// an associativity of 1
///
/// [`CacheLevel`]: crate::cache::CacheLevel
pub struct DirectMappedCache {
    decoder: AddressDecoder,
    valid: Vec<bool>,
    tags: Vec<u32>,
    result: CacheResult,
}

impl DirectMappedCache {
    pub fn new(config: &CacheLevelConfig) -> Result<Self> {
        config.validate_geometry()?;
        if config.associativity != 1 {
            return Err(SimError::NotDirectMapped {
                level: config.level,
                associativity: config.associativity,
            });
        }
        let sets = config.set_count as usize;
        Ok(Self {
            decoder: AddressDecoder::new(config.block_size, config.set_count),
            valid: vec![false; sets],
            tags: vec![0; sets],
            result: CacheResult::new(config.level),
        })
    }
}

impl CacheTrait for DirectMappedCache {
    #[inline]
    fn access(&mut self, address: u32) -> AccessKind {
        let decoded = self.decoder.decode(address);
        let set = decoded.set_index as usize;
        let kind = if !self.valid[set] {
            self.valid[set] = true;
            self.tags[set] = decoded.tag;
            AccessKind::CompulsoryMiss
        } else if self.tags[set] == decoded.tag {
            AccessKind::Hit
        } else {
            self.tags[set] = decoded.tag;
            AccessKind::ConflictMiss
        };
        self.result.record(kind);
        kind
    }

    fn result(&self) -> &CacheResult {
        &self.result
    }

    fn uninitialised_line_count(&self) -> usize {
        self.valid.iter().filter(|valid| !**valid).count()
    }
}
