use serde::{Deserialize, Serialize};

/// How a single access was classified by a cache level
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AccessKind {
    Hit,
    /// The line used had never held data
    CompulsoryMiss,
    /// The whole level was full
    CapacityMiss,
    /// The target set was full while the level still had free lines
    ConflictMiss,
}

impl AccessKind {
    pub fn is_hit(self) -> bool {
        self == AccessKind::Hit
    }
}

/// The counters for one cache level. Can be serialised as part of a report
///
/// `accesses` always equals the sum of the other four counters, as every update goes through
/// [`CacheResult::record`]
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheResult {
    pub level: u64,
    pub hits: u64,
    pub compulsory_misses: u64,
    pub capacity_misses: u64,
    pub conflict_misses: u64,
    pub accesses: u64,
}

impl CacheResult {
    pub fn new(level: u64) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[inline]
    pub fn record(&mut self, kind: AccessKind) {
        self.accesses += 1;
        match kind {
            AccessKind::Hit => self.hits += 1,
            AccessKind::CompulsoryMiss => self.compulsory_misses += 1,
            AccessKind::CapacityMiss => self.capacity_misses += 1,
            AccessKind::ConflictMiss => self.conflict_misses += 1,
        }
    }

    pub fn misses(&self) -> u64 {
        self.compulsory_misses + self.capacity_misses + self.conflict_misses
    }

    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.accesses)
    }

    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses(), self.accesses)
    }

    /// Share of the misses which were compulsory
    pub fn compulsory_miss_rate(&self) -> f64 {
        ratio(self.compulsory_misses, self.misses())
    }

    pub fn capacity_miss_rate(&self) -> f64 {
        ratio(self.capacity_misses, self.misses())
    }

    pub fn conflict_miss_rate(&self) -> f64 {
        ratio(self.conflict_misses, self.misses())
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
