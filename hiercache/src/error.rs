use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the simulator can report
///
/// All of these are fatal to a run. Configuration errors are raised before any address is
/// simulated, trace errors before the trace is handed to the simulator
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unrecognised replacement policy `{0}`, expected one of random (r), lru (l) or fifo (f)")]
    InvalidPolicy(String),

    #[error("no cache level is configured")]
    EmptyConfig,

    #[error("cache L{expected} is not configured, while L{found} is")]
    MissingLevel { expected: u64, found: u64 },

    #[error("the size of cache L{level} is zero")]
    ZeroSizedLevel { level: u64 },

    #[error("L{level}: {field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        level: u64,
        field: &'static str,
        value: u32,
    },

    #[error("the size of cache L{level} ({size} bytes) is smaller than the size of L{} ({previous} bytes)", .level - 1)]
    ShrinkingLevel { level: u64, size: u64, previous: u64 },

    #[error("L{level}: a direct mapped cache needs an associativity of 1, got {associativity}")]
    NotDirectMapped { level: u64, associativity: u32 },

    #[error("couldn't parse level spec `{0}`, expected L<level>:<nsets>:<bsize>:<assoc>:<policy>")]
    InvalidLevelSpec(String),

    #[error("couldn't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: binary trace is {len} bytes, which is not a whole number of 32-bit addresses", .path.display())]
    TruncatedTrace { path: PathBuf, len: u64 },

    #[error("{}:{line}: `{token}` is not an unsigned 32-bit address", .path.display())]
    InvalidTraceValue {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("couldn't serialise the report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
