use std::fs::{self, File};
use std::path::Path;
use log::info;
use memmap2::Mmap;
use crate::config::ComplianceLevel;
use crate::error::{Result, SimError};

/// The on-disk encoding of a trace
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TraceFormat {
    /// Consecutive 32-bit big-endian addresses
    Binary,
    /// Whitespace separated base 10 addresses
    Text,
}

impl TraceFormat {
    /// Picks the format from the file extension
    ///
    /// Only a relaxed compliance level reads `.txt` files as text, otherwise everything is binary
    pub fn detect(path: &Path, compliance: ComplianceLevel) -> Self {
        match compliance {
            ComplianceLevel::Relaxed if path.extension().map_or(false, |ext| ext == "txt") => TraceFormat::Text,
            _ => TraceFormat::Binary,
        }
    }
}

/// Loads a trace file into memory as a list of addresses, in file order
///
/// # Arguments
///
/// * `path`: The trace file
/// * `compliance`: Decides whether text traces are accepted
///
/// returns: Result<Vec<u32>, SimError>
pub fn load_trace(path: &Path, compliance: ComplianceLevel) -> Result<Vec<u32>> {
    let format = TraceFormat::detect(path, compliance);
    let addresses = match format {
        TraceFormat::Binary => read_binary_trace(path)?,
        TraceFormat::Text => {
            let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
            parse_text_trace(path, &text)?
        }
    };
    info!("Loaded {} addresses from {} ({:?})", addresses.len(), path.display(), format);
    Ok(addresses)
}

fn read_binary_trace(path: &Path) -> Result<Vec<u32>> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let len = file.metadata().map_err(|source| io_error(path, source))?.len();
    if len % 4 != 0 {
        return Err(SimError::TruncatedTrace {
            path: path.to_path_buf(),
            len,
        });
    }
    // Mapping an empty file fails on some platforms
    if len == 0 {
        return Ok(Vec::new());
    }
    // Memory map the file, reads are strictly sequential
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| io_error(path, source))?;
    #[cfg(unix)]
    mmap.advise(memmap2::Advice::Sequential).map_err(|source| io_error(path, source))?;
    decode_binary_trace(&mmap).ok_or_else(|| SimError::TruncatedTrace {
        path: path.to_path_buf(),
        len,
    })
}

/// Decodes big-endian 32-bit addresses
///
/// returns: None if the buffer isn't a whole number of addresses
///
/// # Examples
///
/// ```
/// use hiercache::io::decode_binary_trace;
/// assert_eq!(decode_binary_trace(&[0, 0, 0, 16, 0, 0, 1, 0]), Some(vec![16, 256]));
/// assert_eq!(decode_binary_trace(&[0, 0, 0]), None);
/// ```
pub fn decode_binary_trace(bytes: &[u8]) -> Option<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
            .collect(),
    )
}

/// Parses whitespace separated base 10 addresses, any token which isn't a u32 is an error
///
/// `path` is only used for error messages
pub fn parse_text_trace(path: &Path, text: &str) -> Result<Vec<u32>> {
    let mut addresses = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let address = token.parse().map_err(|_| SimError::InvalidTraceValue {
                path: path.to_path_buf(),
                line: line_index + 1,
                token: token.to_string(),
            })?;
            addresses.push(address);
        }
    }
    Ok(addresses)
}

fn io_error(path: &Path, source: std::io::Error) -> SimError {
    SimError::Io {
        path: path.to_path_buf(),
        source,
    }
}
