//! The compression module runs the whole pipeline for one in-memory block.
//!
//! Compression happens in the following steps:
//! - Classify: decide between the repeated-byte shortcut, the block transform, or plain
//!   entropy coding.
//! - Burrows Wheeler Transform (text-like blocks only): sort rotations so equal bytes cluster.
//! - Huffman coding: one canonical table per block.
//! - Effectiveness check: keep the original bytes if coding saved too little.
//! - Framing: header, flags and payload checksum.
//!
//! Decompression is the inverse, driven by the flags recorded in the header so nothing has to
//! be classified again.
//!
//! A `Codec` holds only its configuration. Every call builds its own buffers and tables, so
//! one instance can serve any number of calls, from any number of threads.

pub mod compress;
pub mod config;
pub mod container;
pub mod decompress;
pub mod files;
pub mod progress;

use crate::error::{CodecError, Warning};
use config::CodecConfig;
use container::Container;
use progress::{NoProgress, ProgressObserver};

#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress one block into a container.
    pub fn compress(&self, block: &[u8]) -> Result<Container, CodecError> {
        compress::compress(block, &self.config, &mut NoProgress)
    }

    /// Compress one block, reporting stage boundaries to progress.
    pub fn compress_with_progress(
        &self,
        block: &[u8],
        progress: &mut dyn ProgressObserver,
    ) -> Result<Container, CodecError> {
        compress::compress(block, &self.config, progress)
    }

    /// Verify and decode a serialized container.
    pub fn decompress(&self, bytes: &[u8]) -> Result<(Vec<u8>, Vec<Warning>), CodecError> {
        decompress::decompress(bytes, &self.config, &mut NoProgress)
    }

    /// Verify and decode a serialized container, reporting stage boundaries to progress.
    pub fn decompress_with_progress(
        &self,
        bytes: &[u8],
        progress: &mut dyn ProgressObserver,
    ) -> Result<(Vec<u8>, Vec<Warning>), CodecError> {
        decompress::decompress(bytes, &self.config, progress)
    }
}
