//! Error and warning types returned by the codec.
//!
//! Every fatal condition aborts the current call with a `CodecError` and no partial output.
//! A `Warning` is returned alongside a successfully decoded block.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input (or the size recorded in a container) is over the configured ceiling.
    #[error("input of {size} bytes exceeds the maximum of {max} bytes")]
    InputTooLarge { size: u64, max: u64 },
    /// Bad magic, truncated header, unknown flags or a short entropy stream.
    #[error("invalid container format: {0}")]
    InvalidFormat(String),
    /// Payload CRC does not match the CRC stored in the header.
    #[error("payload checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    Integrity { stored: u32, computed: u32 },
    /// Primary index out of range or otherwise unusable for the inverse transform.
    #[error("corrupt block transform: {0}")]
    CorruptTransform(String),
    /// Code lengths that cannot form a complete prefix code.
    #[error("invalid huffman code table: {0}")]
    InvalidCodeTable(String),
}

/// Recoverable conditions reported by decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The rebuilt block length did not match the stored size. Longer output was truncated,
    /// shorter output is returned as is.
    SizeMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::SizeMismatch { expected, actual } => write!(
                f,
                "reconstructed {} bytes but the container records {} bytes",
                actual, expected
            ),
        }
    }
}
