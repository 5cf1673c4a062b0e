use std::error::Error;
use crate::address::decode;
use crate::cache::{CacheLevel, CacheTrait, GenericCacheLevel};
use crate::direct_mapped::DirectMappedCache;
use crate::error::SimError;
use crate::config::{CacheLevelConfig, LayeredCacheConfig, ReplacementPolicyConfig};
use crate::hierarchy::CacheHierarchy;
use crate::replacement_policies::{FirstInFirstOut, LeastRecentlyUsed, Random};
use crate::simulator::Simulator;
use crate::stats::{AccessKind, CacheResult};
use crate::util::{random_trace, repeat_trace, sequential_trace, strided_trace};

use crate::config::ReplacementPolicyConfig::{FirstInFirstOut as Fifo, LeastRecentlyUsed as Lru, Random as Rand};

fn layered(levels: &[(u32, u32, u32, ReplacementPolicyConfig)]) -> LayeredCacheConfig {
    (1u64..)
        .zip(levels)
        .map(|(level, &(nsets, bsize, assoc, policy))| CacheLevelConfig::new(level, nsets, bsize, assoc, policy))
        .collect()
}

fn counters(result: &CacheResult) -> (u64, u64, u64, u64, u64) {
    (
        result.hits,
        result.compulsory_misses,
        result.capacity_misses,
        result.conflict_misses,
        result.accesses,
    )
}

#[test]
fn decode_splits_address_fields() {
    let decoded = decode(0x1234_5678, 16, 256);
    assert_eq!(decoded.block_offset, 0x8);
    assert_eq!(decoded.set_index, 0x67);
    assert_eq!(decoded.tag, 0x12345);

    // Offset and index bits cover the whole address, nothing is left for the tag
    let decoded = decode(0xFFFF_FFFF, 1 << 16, 1 << 16);
    assert_eq!((decoded.tag, decoded.set_index, decoded.block_offset), (0, 0xFFFF, 0xFFFF));

    let decoded = decode(0xDEAD_BEEF, 1, 1);
    assert_eq!((decoded.tag, decoded.set_index, decoded.block_offset), (0xDEAD_BEEF, 0, 0));
}

#[test]
fn direct_mapped_scenario_reports_conflicts() -> Result<(), Box<dyn Error>> {
    let config = layered(&[(4, 4, 1, Rand)]);
    let simulator = Simulator::new(&config, Some(0))?;
    assert!(simulator.is_direct_mapped());
    let report = simulator.run(&[0, 16, 0, 32]);
    let l1 = &report.result.caches[0];
    assert_eq!(counters(l1), (0, 1, 0, 3, 4));
    assert_eq!(report.result.main_memory_accesses, 4);
    assert_eq!(report.uninitialised_lines, vec![3]);
    Ok(())
}

#[test]
fn direct_mapped_fast_path_matches_general_level() -> Result<(), Box<dyn Error>> {
    let config = layered(&[(64, 16, 1, Lru)]);
    let trace = random_trace(7, 1 << 14, 20_000);

    let fast = Simulator::new(&config, None)?.run(&trace).result.caches;

    // Single level hierarchies normally take the fast path, build one directly instead
    let general = CacheHierarchy::new(&config, None)?.run_trace(&trace);
    assert_eq!(fast, general);

    let level = &config.caches[0];
    let mut lru = CacheLevel::new(level, LeastRecentlyUsed)?;
    let mut random = CacheLevel::new(level, Random::new(Some(3)))?;
    for &address in &trace {
        lru.access(address);
        random.access(address);
    }
    assert_eq!(&fast[0], lru.result());
    assert_eq!(&fast[0], random.result());
    assert_eq!(fast[0].capacity_misses, 0);
    Ok(())
}

#[test]
fn lru_evicts_least_recently_used() -> Result<(), Box<dyn Error>> {
    let config = CacheLevelConfig::new(1, 1, 4, 2, Lru);
    let mut level = CacheLevel::new(&config, LeastRecentlyUsed)?;
    let (a, b, c) = (0, 4, 8);
    let kinds: Vec<_> = [a, b, a, c, a, b].iter().map(|&x| level.access(x)).collect();
    // C replaces B, so A still hits and B comes back as a miss
    assert_eq!(
        kinds,
        vec![
            AccessKind::CompulsoryMiss,
            AccessKind::CompulsoryMiss,
            AccessKind::Hit,
            AccessKind::CapacityMiss,
            AccessKind::Hit,
            AccessKind::CapacityMiss,
        ]
    );
    Ok(())
}

#[test]
fn fifo_evicts_first_inserted() -> Result<(), Box<dyn Error>> {
    let config = CacheLevelConfig::new(1, 1, 4, 2, Fifo);
    let mut level = CacheLevel::new(&config, FirstInFirstOut)?;
    let (a, b, c) = (0, 4, 8);
    let kinds: Vec<_> = [a, b, a, c, b, a].iter().map(|&x| level.access(x)).collect();
    // The hit on A doesn't save it, C replaces it and B survives
    assert_eq!(
        kinds,
        vec![
            AccessKind::CompulsoryMiss,
            AccessKind::CompulsoryMiss,
            AccessKind::Hit,
            AccessKind::CapacityMiss,
            AccessKind::Hit,
            AccessKind::CapacityMiss,
        ]
    );
    Ok(())
}

#[test]
fn conflict_until_whole_level_is_full() -> Result<(), Box<dyn Error>> {
    // 2 sets of 2 ways, 4 byte blocks: multiples of 8 land in set 0, the rest of the words in set 1
    let config = CacheLevelConfig::new(1, 2, 4, 2, Lru);
    let mut level = CacheLevel::new(&config, LeastRecentlyUsed)?;
    assert_eq!(level.access(0), AccessKind::CompulsoryMiss);
    assert_eq!(level.access(8), AccessKind::CompulsoryMiss);
    assert_eq!(level.access(16), AccessKind::ConflictMiss);
    assert!(!level.is_known_full());
    assert_eq!(level.access(4), AccessKind::CompulsoryMiss);
    assert_eq!(level.access(12), AccessKind::CompulsoryMiss);
    // 0 was evicted by 16
    assert_eq!(level.access(0), AccessKind::CapacityMiss);
    assert!(level.is_known_full());
    assert_eq!(level.uninitialised_line_count(), 0);
    assert_eq!(counters(level.result()), (0, 4, 1, 1, 6));
    Ok(())
}

#[test]
fn fullness_is_monotone() -> Result<(), Box<dyn Error>> {
    for policy in [Rand, Lru, Fifo] {
        let config = CacheLevelConfig::new(1, 8, 8, 4, policy);
        let mut hierarchy = CacheHierarchy::new(&layered(&[(8, 8, 4, policy)]), Some(11))?;
        let mut level: GenericCacheLevel = match policy {
            Rand => CacheLevel::new(&config, Random::new(Some(11)))?.into(),
            Lru => CacheLevel::new(&config, LeastRecentlyUsed)?.into(),
            Fifo => CacheLevel::new(&config, FirstInFirstOut)?.into(),
        };
        let mut full = false;
        for address in random_trace(5, 4096, 5_000) {
            let kind = level.access(address);
            hierarchy.access(address);
            if full {
                assert!(level.is_known_full());
                assert_ne!(kind, AccessKind::ConflictMiss);
                assert_ne!(kind, AccessKind::CompulsoryMiss);
            }
            full = level.is_known_full();
        }
        assert!(full, "{policy} level never filled");
        assert_eq!(level.result(), hierarchy.levels()[0].result());
    }
    Ok(())
}

#[test]
fn misses_cascade_and_hits_stop() -> Result<(), Box<dyn Error>> {
    let config = layered(&[(1, 4, 2, Lru), (4, 4, 2, Lru)]);
    let mut hierarchy = CacheHierarchy::new(&config, None)?;
    let (a, b, c) = (0, 4, 8);
    assert_eq!(hierarchy.access(a), vec![AccessKind::CompulsoryMiss, AccessKind::CompulsoryMiss]);
    assert_eq!(hierarchy.access(b), vec![AccessKind::CompulsoryMiss, AccessKind::CompulsoryMiss]);
    assert_eq!(hierarchy.access(a), vec![AccessKind::Hit]);
    assert_eq!(hierarchy.access(c), vec![AccessKind::CapacityMiss, AccessKind::CompulsoryMiss]);
    // B left L1 but is still in L2
    assert_eq!(hierarchy.access(b), vec![AccessKind::CapacityMiss, AccessKind::Hit]);

    let results = hierarchy.results();
    assert_eq!(counters(&results[0]), (1, 2, 2, 0, 5));
    assert_eq!(counters(&results[1]), (1, 3, 0, 0, 4));
    Ok(())
}

#[test]
fn counters_hold_invariants_across_levels() -> Result<(), Box<dyn Error>> {
    let trace = random_trace(42, 1 << 16, 50_000);
    for policy in [Rand, Lru, Fifo] {
        let config = layered(&[(16, 16, 2, policy), (64, 16, 4, policy), (128, 32, 8, policy)]);
        let report = Simulator::new(&config, Some(1))?.run(&trace);
        let results = &report.result.caches;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].accesses, trace.len() as u64);
        for (result, level) in results.iter().zip(&config.caches) {
            assert_eq!(result.level, level.level);
            assert_eq!(
                result.accesses,
                result.hits + result.compulsory_misses + result.capacity_misses + result.conflict_misses
            );
            assert!(result.compulsory_misses <= level.line_count());
        }
        for pair in results.windows(2) {
            assert_eq!(pair[1].accesses, pair[0].misses());
        }
        assert_eq!(report.result.main_memory_accesses, results[2].misses());
    }
    Ok(())
}

#[test]
fn same_trace_same_results() -> Result<(), Box<dyn Error>> {
    let trace = random_trace(3, 1 << 15, 20_000);
    for policy in [Lru, Fifo] {
        let config = layered(&[(32, 16, 4, policy), (128, 16, 4, policy)]);
        let first = Simulator::new(&config, None)?.run(&trace).result;
        let second = Simulator::new(&config, None)?.run(&trace).result;
        assert_eq!(first, second);
    }
    // Random is only reproducible with a seed
    let config = layered(&[(32, 16, 4, Rand), (128, 16, 4, Rand)]);
    let first = Simulator::new(&config, Some(99))?.run(&trace).result;
    let second = Simulator::new(&config, Some(99))?.run(&trace).result;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn looping_over_a_set_thrashes_lru() -> Result<(), Box<dyn Error>> {
    // Three blocks cycling through a 2-way set: LRU always evicts the next block needed
    let pattern = strided_trace(0, 64, 3);
    let trace = repeat_trace(&pattern, 10);
    let config = layered(&[(1, 64, 2, Lru)]);
    let lru = &Simulator::new(&config, None)?.run(&trace).result.caches[0];
    assert_eq!(counters(lru), (0, 2, 28, 0, 30));
    Ok(())
}

#[test]
fn empty_trace_produces_zeroed_results() -> Result<(), Box<dyn Error>> {
    let config = layered(&[(4, 4, 2, Lru), (8, 4, 2, Fifo)]);
    let report = Simulator::new(&config, None)?.run(&[]);
    assert_eq!(report.result.caches, vec![CacheResult::new(1), CacheResult::new(2)]);
    assert_eq!(report.result.main_memory_accesses, 0);
    assert_eq!(report.uninitialised_lines, vec![8, 16]);
    Ok(())
}

#[test]
fn levels_reject_bad_geometry() {
    assert!(matches!(
        CacheLevel::new(&CacheLevelConfig::new(1, 3, 4, 2, Lru), LeastRecentlyUsed),
        Err(SimError::NotPowerOfTwo { level: 1, field: "nsets", value: 3 })
    ));
    assert!(matches!(
        CacheLevel::new(&CacheLevelConfig::new(1, 4, 4, 0, Fifo), FirstInFirstOut),
        Err(SimError::ZeroSizedLevel { level: 1 })
    ));
    assert!(matches!(
        DirectMappedCache::new(&CacheLevelConfig::new(1, 4, 4, 2, Lru)),
        Err(SimError::NotDirectMapped { level: 1, associativity: 2 })
    ));
    assert!(matches!(
        DirectMappedCache::new(&CacheLevelConfig::new(1, 4, 12, 1, Lru)),
        Err(SimError::NotPowerOfTwo { level: 1, field: "bsize", value: 12 })
    ));
}

#[test]
fn hierarchy_validates_its_levels() {
    let config: LayeredCacheConfig = [CacheLevelConfig::new(0, 4, 4, 2, Rand)].into_iter().collect();
    assert!(matches!(
        CacheHierarchy::new(&config, Some(5)),
        Err(SimError::MissingLevel { expected: 1, found: 0 })
    ));
}

#[test]
fn direct_mapped_level_still_tracks_fullness() -> Result<(), Box<dyn Error>> {
    // 2 sets of 1 way, 4 byte blocks: 0 and 8 share set 0, 4 is in set 1
    let config = CacheLevelConfig::new(1, 2, 4, 1, Lru);
    let mut level: GenericCacheLevel = GenericCacheLevel::from_config(&config, None)?;
    assert_eq!(level.access(0), AccessKind::CompulsoryMiss);
    assert_eq!(level.access(4), AccessKind::CompulsoryMiss);
    assert!(!level.is_known_full());
    assert_eq!(level.access(8), AccessKind::ConflictMiss);
    assert!(level.is_known_full());
    assert_eq!(level.access(0), AccessKind::ConflictMiss);
    Ok(())
}

#[test]
fn sequential_walk_misses_once_per_block() -> Result<(), Box<dyn Error>> {
    // 64 bytes in 16 byte blocks exactly fill 4 direct mapped sets
    let trace = sequential_trace(0, 64);
    let config = layered(&[(4, 16, 1, Lru)]);
    let report = Simulator::new(&config, None)?.run(&trace);
    assert_eq!(counters(&report.result.caches[0]), (60, 4, 0, 0, 64));
    assert_eq!(report.uninitialised_lines, vec![0]);
    Ok(())
}
