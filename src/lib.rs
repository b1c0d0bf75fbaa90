//! A block-sorting single block compressor.
//!
//! Provides compression and decompression of one in-memory block at a time, bounded by a
//! configurable maximum size (50 MiB by default).
//!
//! Text-like blocks go through a Burrows-Wheeler transform before a canonical Huffman code.
//! Other blocks are Huffman coded directly, and blocks of one repeated byte collapse to that
//! byte. Whatever the path, the result is framed in a 13 byte header carrying the original
//! size, the path taken, and a CRC of the payload. If coding does not save at least 5% the
//! original bytes are stored instead.
//!
//! ```
//! let data = "id,name\n1,ann\n2,bob\n3,cy\n".repeat(10);
//! let container = bwzip::compress(data.as_bytes(), 1 << 20).unwrap();
//! let (restored, warnings) = bwzip::decompress(&container.to_bytes()).unwrap();
//! assert_eq!(restored, data.as_bytes());
//! assert!(warnings.is_empty());
//! ```
//!
pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::config::CodecConfig;
pub use compression::container::Container;
pub use compression::progress::{ProgressObserver, Stage};
pub use compression::Codec;
pub use error::{CodecError, Warning};

/// Compress a block no larger than max_size bytes, with default policy otherwise.
pub fn compress(block: &[u8], max_size: usize) -> Result<Container, CodecError> {
    Codec::new(CodecConfig {
        max_input_size: max_size,
        ..CodecConfig::default()
    })
    .compress(block)
}

/// Decompress a serialized container made by `compress`. The only size ceiling is the one
/// the 4 byte size field imposes, so any container `compress` produced can be read back.
pub fn decompress(bytes: &[u8]) -> Result<(Vec<u8>, Vec<Warning>), CodecError> {
    Codec::new(CodecConfig {
        max_input_size: u32::MAX as usize,
        ..CodecConfig::default()
    })
    .decompress(bytes)
}
