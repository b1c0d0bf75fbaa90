//! Policy constants for the codec, gathered in one place so they can be tuned without touching
//! the algorithms.

/// Largest block accepted by one call: 50 MiB.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 50 * 1024 * 1024;

/// All user settable codec policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfig {
    /// Inputs (and recorded sizes on decompression) above this are rejected up front.
    pub max_input_size: usize,
    /// How many leading bytes the classifier samples.
    pub text_sample_len: usize,
    /// Fraction of text-like bytes in the sample that selects the block transform.
    pub text_ratio: f64,
    /// Shortest block eligible for the repeated-byte shortcut.
    pub min_degenerate_len: usize,
    /// Encoded size over original size above which the encoding is thrown away and the
    /// block stored raw.
    pub acceptance_ratio: f64,
    /// Lines examined by the delimiter consistency check.
    pub structure_sample_lines: usize,
    /// Fewest complete lines needed before delimiters count as consistent.
    pub structure_min_lines: usize,
    /// Field separators the delimiter check looks for.
    pub delimiters: Vec<u8>,
    /// Blocks shorter than this sort rotations by direct comparison.
    pub small_sort_threshold: usize,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            text_sample_len: 10_000,
            text_ratio: 0.85,
            min_degenerate_len: 32,
            acceptance_ratio: 0.95,
            structure_sample_lines: 16,
            structure_min_lines: 3,
            delimiters: vec![b',', b'\t', b';', b'|'],
            small_sort_threshold: 4096,
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}
