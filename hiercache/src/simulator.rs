use std::time::{Duration, Instant};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use crate::cache::CacheTrait;
use crate::config::LayeredCacheConfig;
use crate::direct_mapped::DirectMappedCache;
use crate::error::Result;
use crate::hierarchy::CacheHierarchy;
use crate::stats::CacheResult;

/// The simulator picks the engine for a configuration, replays one trace, and collects results.
///
/// A simulator is consumed by [`Simulator::run`], caches are never reused across traces
pub struct Simulator {
    engine: Engine,
}

enum Engine {
    DirectMapped(DirectMappedCache),
    Hierarchy(CacheHierarchy),
}

/// Everything produced by one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub result: LayeredCacheResult,
    pub simulation_time: Duration,
    /// Lines never filled, per level
    pub uninitialised_lines: Vec<u64>,
}

/// The counters of a run. Can be serialised as the JSON report
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct LayeredCacheResult {
    pub main_memory_accesses: u64,
    pub caches: Vec<CacheResult>,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// The configuration is validated first. A single direct mapped level uses the fast path,
    /// anything else a full hierarchy
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually built from the command line
    /// * `seed`: Seed for random replacement, entropy is used when `None`
    ///
    /// returns: Result<Simulator, SimError>
    pub fn new(config: &LayeredCacheConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let engine = match config.caches.as_slice() {
            [only] if only.associativity == 1 => {
                debug!("Single direct mapped level, using the fast path");
                Engine::DirectMapped(DirectMappedCache::new(only)?)
            }
            _ => {
                debug!("Simulating {} level(s)", config.caches.len());
                Engine::Hierarchy(CacheHierarchy::new(config, seed)?)
            }
        };
        Ok(Self { engine })
    }

    /// Whether the direct mapped fast path was chosen
    pub fn is_direct_mapped(&self) -> bool {
        matches!(self.engine, Engine::DirectMapped(_))
    }

    /// Simulates the whole trace, address by address
    ///
    /// # Arguments
    ///
    /// * `addresses`: The trace, in access order
    ///
    /// returns: SimulationReport
    pub fn run(self, addresses: &[u32]) -> SimulationReport {
        let start = Instant::now();
        let (caches, uninitialised_lines) = match self.engine {
            Engine::DirectMapped(mut cache) => {
                for &address in addresses {
                    cache.access(address);
                }
                (vec![cache.result().clone()], vec![cache.uninitialised_line_count() as u64])
            }
            Engine::Hierarchy(mut hierarchy) => {
                let results = hierarchy.run_trace(addresses);
                let uninitialised = hierarchy
                    .levels()
                    .iter()
                    .map(|level| level.uninitialised_line_count() as u64)
                    .collect();
                (results, uninitialised)
            }
        };
        let simulation_time = start.elapsed();
        for result in &caches {
            trace!("L{}: {:?}", result.level, result);
        }
        // Main memory accesses are whatever misses the last cache
        let main_memory_accesses = caches.last().map(CacheResult::misses).unwrap_or(0);
        SimulationReport {
            result: LayeredCacheResult {
                main_memory_accesses,
                caches,
            },
            simulation_time,
            uninitialised_lines,
        }
    }
}
