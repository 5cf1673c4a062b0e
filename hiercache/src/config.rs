use std::fmt;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::error::{Result, SimError};

/// A cache configuration with multiple levels, kept in ascending level order
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LayeredCacheConfig {
    pub caches: Vec<CacheLevelConfig>,
}

/// The configuration for a single cache level
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheLevelConfig {
    /// 1-based rank, L1 is closest to the processor
    pub level: u64,
    #[serde(alias = "nsets")]
    pub set_count: u32,
    #[serde(alias = "bsize")]
    pub block_size: u32,
    #[serde(alias = "assoc")]
    pub associativity: u32,
    #[serde(default)]
    pub replacement_policy: ReplacementPolicyConfig,
}

/// The replacement policy - random, lru, or fifo. Defaults to random.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReplacementPolicyConfig {
    #[default]
    #[serde(alias = "random", alias = "r")]
    Random,
    #[serde(alias = "lru", alias = "l")]
    LeastRecentlyUsed,
    #[serde(alias = "fifo", alias = "f")]
    FirstInFirstOut,
}

/// How closely input handling sticks to the plain binary trace format
///
/// Only the trace loader looks at this, the simulator itself behaves the same at every level
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ComplianceLevel {
    /// Extra input formats are accepted, `.txt` traces are read as text
    Relaxed,
    /// Every trace is binary, whatever its extension
    #[default]
    Strict,
    /// As strict, no additional features at all
    VeryStrict,
}

lazy_static! {
    static ref LEVEL_SPEC: Regex = Regex::new(
        r"^[Ll]?(?P<level>\d+):(?P<nsets>\d+):(?P<bsize>\d+):(?P<assoc>\d+):(?P<policy>[A-Za-z]+)$"
    )
    .expect("level spec pattern is valid");
}

impl FromStr for ReplacementPolicyConfig {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "random" => Ok(Self::Random),
            "l" | "lru" => Ok(Self::LeastRecentlyUsed),
            "f" | "fifo" => Ok(Self::FirstInFirstOut),
            _ => Err(SimError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::LeastRecentlyUsed => "lru",
            Self::FirstInFirstOut => "fifo",
        };
        f.write_str(name)
    }
}

impl CacheLevelConfig {
    pub fn new(level: u64, set_count: u32, block_size: u32, associativity: u32, replacement_policy: ReplacementPolicyConfig) -> Self {
        Self {
            level,
            set_count,
            block_size,
            associativity,
            replacement_policy,
        }
    }

    /// Capacity of the level in bytes
    pub fn total_size(&self) -> u64 {
        self.set_count as u64 * self.block_size as u64 * self.associativity as u64
    }

    /// Total number of lines across every set
    pub fn line_count(&self) -> u64 {
        self.set_count as u64 * self.associativity as u64
    }

    /// Checks the geometry of this level on its own: nonzero, and every dimension a power of two
    pub fn validate_geometry(&self) -> Result<()> {
        if self.total_size() == 0 {
            return Err(SimError::ZeroSizedLevel { level: self.level });
        }
        for (field, value) in [
            ("bsize", self.block_size),
            ("assoc", self.associativity),
            ("nsets", self.set_count),
        ] {
            if !value.is_power_of_two() {
                return Err(SimError::NotPowerOfTwo {
                    level: self.level,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Parses `L<level>:<nsets>:<bsize>:<assoc>:<policy>`, the leading `L` being optional
///
/// # Examples
///
/// ```
/// use hiercache::config::{CacheLevelConfig, ReplacementPolicyConfig};
/// let config: CacheLevelConfig = "L2:256:64:4:lru".parse().unwrap();
/// assert_eq!(config.level, 2);
/// assert_eq!(config.replacement_policy, ReplacementPolicyConfig::LeastRecentlyUsed);
/// ```
impl FromStr for CacheLevelConfig {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SimError::InvalidLevelSpec(s.to_string());
        let captures = LEVEL_SPEC.captures(s.trim()).ok_or_else(invalid)?;
        let level = captures["level"].parse().map_err(|_| invalid())?;
        let set_count = captures["nsets"].parse().map_err(|_| invalid())?;
        let block_size = captures["bsize"].parse().map_err(|_| invalid())?;
        let associativity = captures["assoc"].parse().map_err(|_| invalid())?;
        let replacement_policy = captures["policy"].parse()?;
        Ok(Self::new(level, set_count, block_size, associativity, replacement_policy))
    }
}

impl LayeredCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a level, keeping the list sorted by level
    ///
    /// The new level goes in front of the first level which is not lower than it, so a duplicate
    /// ends up before the existing entry and is later rejected by [`LayeredCacheConfig::validate`]
    pub fn push(&mut self, config: CacheLevelConfig) {
        let position = self
            .caches
            .iter()
            .position(|existing| existing.level >= config.level)
            .unwrap_or(self.caches.len());
        self.caches.insert(position, config);
    }

    /// Verifies the list of levels can be simulated
    ///
    /// Levels must start at L1 and be contiguous, no level may be empty or smaller than the level
    /// above it, and every dimension must be a power of two
    pub fn validate(&self) -> Result<()> {
        let first = self.caches.first().ok_or(SimError::EmptyConfig)?;
        if first.level != 1 {
            return Err(SimError::MissingLevel {
                expected: 1,
                found: first.level,
            });
        }
        let mut previous_size = 0;
        for (expected, config) in (1u64..).zip(&self.caches) {
            if config.level != expected {
                return Err(SimError::MissingLevel {
                    expected,
                    found: config.level,
                });
            }
            let size = config.total_size();
            if size == 0 {
                return Err(SimError::ZeroSizedLevel { level: config.level });
            }
            if size < previous_size {
                return Err(SimError::ShrinkingLevel {
                    level: config.level,
                    size,
                    previous: previous_size,
                });
            }
            config.validate_geometry()?;
            previous_size = size;
        }
        Ok(())
    }
}

impl FromIterator<CacheLevelConfig> for LayeredCacheConfig {
    fn from_iter<I: IntoIterator<Item = CacheLevelConfig>>(iter: I) -> Self {
        let mut config = Self::new();
        for level in iter {
            config.push(level);
        }
        config
    }
}
