use crate::address::AddressDecoder;
use crate::config::{CacheLevelConfig, ReplacementPolicyConfig};
use crate::error::Result;
use crate::replacement_policies::{FirstInFirstOut, LeastRecentlyUsed, Line, NoPolicy, Random, ReplacementPolicy};
use crate::stats::{AccessKind, CacheResult};

/// A generic trait for a single level of cache
///
/// Forwarding misses to the next level is the caller's job, a level only classifies and records
/// the accesses it sees
pub trait CacheTrait {
    /// Looks up an address, updating the lines, the replacement policy and the level's counters
    ///
    /// Exactly one of hits, compulsory, capacity or conflict misses is incremented, along with
    /// the access count
    ///
    /// # Arguments
    ///
    /// * `address`: The byte address being accessed
    ///
    /// returns: AccessKind
    fn access(&mut self, address: u32) -> AccessKind;

    /// The counters accumulated so far
    fn result(&self) -> &CacheResult;

    /// Gets the number of lines which have never been filled. Useful for analysing cache
    /// performance or debugging
    fn uninitialised_line_count(&self) -> usize;
}

/// One cache level, parameterised by a replacement policy
///
/// Lines are kept in one flat vector, set `s` owning the `associativity` lines starting at
/// `s * associativity`. The generic parameter is monomorphised, so policies which do nothing on a
/// hit cost nothing on a hit
pub struct CacheLevel<R: ReplacementPolicy> {
    config: CacheLevelConfig,
    decoder: AddressDecoder,
    lines: Vec<Line>,
    associativity: usize,
    policy: R,
    clock: u64,
    filled_lines: usize,
    // Once set never cleared, lines are never invalidated
    known_full: bool,
    result: CacheResult,
}

impl<R: ReplacementPolicy> CacheLevel<R> {
    /// Builds an empty level, re-checking the geometry so bad bit maths can't happen silently
    pub fn new(config: &CacheLevelConfig, policy: R) -> Result<Self> {
        config.validate_geometry()?;
        Ok(Self {
            config: *config,
            decoder: AddressDecoder::new(config.block_size, config.set_count),
            lines: vec![Line::default(); config.line_count() as usize],
            associativity: config.associativity as usize,
            policy,
            clock: 0,
            filled_lines: 0,
            known_full: false,
            result: CacheResult::new(config.level),
        })
    }

    pub fn config(&self) -> &CacheLevelConfig {
        &self.config
    }

    /// Whether every line of the level has been seen to be valid
    pub fn is_known_full(&self) -> bool {
        self.known_full
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        if R::USES_CLOCK {
            self.clock += 1;
        }
        self.clock
    }

    /// Lazily checks whether the level is full, caching a positive answer
    #[inline]
    fn check_full(&mut self) -> bool {
        if !self.known_full {
            self.known_full = self.filled_lines == self.lines.len();
        }
        self.known_full
    }

    fn classify_and_update(&mut self, address: u32) -> AccessKind {
        let decoded = self.decoder.decode(address);
        let lower = decoded.set_index as usize * self.associativity;
        let upper = lower + self.associativity;

        // Only search the relevant set, remembering the first free line on the way
        let mut free = None;
        let mut x = lower;
        while x < upper {
            let line = &self.lines[x];
            if line.valid {
                if line.tag == decoded.tag {
                    let now = self.tick();
                    self.policy.update_on_hit(&mut self.lines[x], now);
                    return AccessKind::Hit;
                }
            } else if free.is_none() {
                free = Some(x);
            }
            x += 1;
        }

        if let Some(x) = free {
            let now = self.tick();
            let line = &mut self.lines[x];
            line.valid = true;
            line.tag = decoded.tag;
            self.policy.update_on_insert(line, now);
            self.filled_lines += 1;
            return AccessKind::CompulsoryMiss;
        }

        let victim = lower + self.policy.select_victim(&self.lines[lower..upper]);
        let now = self.tick();
        let line = &mut self.lines[victim];
        line.tag = decoded.tag;
        self.policy.update_on_insert(line, now);

        // Fullness is tracked for every level, but a single line set has no choice of victim, so
        // it can only ever conflict
        let full = self.check_full();
        if self.associativity > 1 && full {
            AccessKind::CapacityMiss
        } else {
            AccessKind::ConflictMiss
        }
    }
}

impl<R: ReplacementPolicy> CacheTrait for CacheLevel<R> {
    #[inline]
    fn access(&mut self, address: u32) -> AccessKind {
        let kind = self.classify_and_update(address);
        self.result.record(kind);
        kind
    }

    fn result(&self) -> &CacheResult {
        &self.result
    }

    fn uninitialised_line_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.valid).count()
    }
}

/// Enum for every kind of level the simulator builds
///
/// Trait objects would be dereferenced for each address in the trace, which the compiler can't
/// see through. Branching explicitly keeps the concrete types visible so the policy calls inline
pub enum GenericCacheLevel {
    Random(CacheLevel<Random>),
    LeastRecentlyUsed(CacheLevel<LeastRecentlyUsed>),
    FirstInFirstOut(CacheLevel<FirstInFirstOut>),
    NoPolicy(CacheLevel<NoPolicy>),
}

impl GenericCacheLevel {
    /// Creates a level from its configuration
    ///
    /// Direct mapped levels ignore the configured policy, there is never a victim to choose
    ///
    /// # Arguments
    ///
    /// * `config`: The level's configuration
    /// * `seed`: Seed for a random policy's generator, entropy is used when `None`
    ///
    /// returns: Result<GenericCacheLevel, SimError>
    pub fn from_config(config: &CacheLevelConfig, seed: Option<u64>) -> Result<Self> {
        if config.associativity == 1 {
            return Ok(CacheLevel::new(config, NoPolicy)?.into());
        }
        Ok(match config.replacement_policy {
            ReplacementPolicyConfig::Random => CacheLevel::new(config, Random::new(seed))?.into(),
            ReplacementPolicyConfig::LeastRecentlyUsed => CacheLevel::new(config, LeastRecentlyUsed)?.into(),
            ReplacementPolicyConfig::FirstInFirstOut => CacheLevel::new(config, FirstInFirstOut)?.into(),
        })
    }

    pub fn is_known_full(&self) -> bool {
        match self {
            GenericCacheLevel::Random(c) => c.is_known_full(),
            GenericCacheLevel::LeastRecentlyUsed(c) => c.is_known_full(),
            GenericCacheLevel::FirstInFirstOut(c) => c.is_known_full(),
            GenericCacheLevel::NoPolicy(c) => c.is_known_full(),
        }
    }
}

impl From<CacheLevel<Random>> for GenericCacheLevel {
    fn from(value: CacheLevel<Random>) -> Self {
        Self::Random(value)
    }
}

impl From<CacheLevel<LeastRecentlyUsed>> for GenericCacheLevel {
    fn from(value: CacheLevel<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl From<CacheLevel<FirstInFirstOut>> for GenericCacheLevel {
    fn from(value: CacheLevel<FirstInFirstOut>) -> Self {
        Self::FirstInFirstOut(value)
    }
}

impl From<CacheLevel<NoPolicy>> for GenericCacheLevel {
    fn from(value: CacheLevel<NoPolicy>) -> Self {
        Self::NoPolicy(value)
    }
}

impl CacheTrait for GenericCacheLevel {
    #[inline]
    fn access(&mut self, address: u32) -> AccessKind {
        match self {
            GenericCacheLevel::Random(c) => c.access(address),
            GenericCacheLevel::LeastRecentlyUsed(c) => c.access(address),
            GenericCacheLevel::FirstInFirstOut(c) => c.access(address),
            GenericCacheLevel::NoPolicy(c) => c.access(address),
        }
    }

    fn result(&self) -> &CacheResult {
        match self {
            GenericCacheLevel::Random(c) => c.result(),
            GenericCacheLevel::LeastRecentlyUsed(c) => c.result(),
            GenericCacheLevel::FirstInFirstOut(c) => c.result(),
            GenericCacheLevel::NoPolicy(c) => c.result(),
        }
    }

    fn uninitialised_line_count(&self) -> usize {
        match self {
            GenericCacheLevel::Random(c) => c.uninitialised_line_count(),
            GenericCacheLevel::LeastRecentlyUsed(c) => c.uninitialised_line_count(),
            GenericCacheLevel::FirstInFirstOut(c) => c.uninitialised_line_count(),
            GenericCacheLevel::NoPolicy(c) => c.uninitialised_line_count(),
        }
    }
}
