//! # HierCache
//!
//! HierCache simulates a hierarchy of caches over a trace of 32-bit addresses
//!
//! Each level is described by its set count, block size, associativity and replacement policy
//! (random, LRU or FIFO). Every address is looked up at L1, misses cascade to the next level, and
//! each level reports its hits and its compulsory, capacity and conflict misses
//!
//! A single direct mapped level takes a fast path with no replacement bookkeeping, it produces
//! the same counters as the general implementation

/// Splits addresses into tag, set index and block offset
pub mod address;

/// Contains the implementation of a cache level, and a utility enum for the existing level types
pub mod cache;

/// Contains the level configurations, their validation, and the level spec string format
pub mod config;

/// The specialised single-level direct mapped cache
pub mod direct_mapped;

/// The error type shared by configuration, trace loading and reporting
pub mod error;

/// Chains levels together and cascades misses down the chain
pub mod hierarchy;

/// Reads binary and text trace files
pub mod io;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Renders results in the freeform, standardized and JSON formats
pub mod report;

/// Contains the simulator used to run a trace against a given configuration
pub mod simulator;

/// Per-level hit and miss counters
pub mod stats;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
