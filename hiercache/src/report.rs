use crate::error::Result;
use crate::simulator::LayeredCacheResult;
use crate::stats::CacheResult;

/// How the counters are printed
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OutputFormat {
    /// Labelled lines, one block per level
    Freeform,
    /// One comma separated line of rates per level
    Standardized,
    Json,
}

impl OutputFormat {
    /// Maps the numeric output flag, 0 for freeform and 1 for standardized
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(OutputFormat::Freeform),
            1 => Some(OutputFormat::Standardized),
            _ => None,
        }
    }
}

/// Renders a run's results, without a trailing newline
pub fn render(result: &LayeredCacheResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Freeform => Ok(result
            .caches
            .iter()
            .map(freeform)
            .collect::<Vec<_>>()
            .join("\n\n")),
        OutputFormat::Standardized => Ok(result
            .caches
            .iter()
            .map(standardized)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn freeform(result: &CacheResult) -> String {
    format!(
        "L{}\n\
         Hits: {}\n\
         Misses: {}\n\
         Compulsory Misses: {}\n\
         Capacity Misses: {}\n\
         Conflict Misses: {}\n\
         Accesses: {}\n\
         Hit rate: {:.6}\n\
         Miss rate: {:.6}\n\
         Compulsory miss rate: {:.6}\n\
         Capacity miss rate: {:.6}\n\
         Conflict miss rate: {:.6}",
        result.level,
        result.hits,
        result.misses(),
        result.compulsory_misses,
        result.capacity_misses,
        result.conflict_misses,
        result.accesses,
        result.hit_rate(),
        result.miss_rate(),
        result.compulsory_miss_rate(),
        result.capacity_miss_rate(),
        result.conflict_miss_rate(),
    )
}

fn standardized(result: &CacheResult) -> String {
    format!(
        "{}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6}",
        result.accesses,
        result.hit_rate(),
        result.miss_rate(),
        result.compulsory_miss_rate(),
        result.capacity_miss_rate(),
        result.conflict_miss_rate(),
    )
}
