//! Decides which code path a block takes before any encoding happens.
//!
//! Two questions are answered. Is the block one byte value repeated (the degenerate shortcut),
//! and does it look like text worth running through the block transform? The second answer
//! only reads a bounded head and tail of the block. The first stops at the first byte that
//! differs.
use log::debug;
use rustc_hash::FxHashMap;

use crate::compression::config::CodecConfig;

/// Outcome of classifying one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Run the block transform ahead of the entropy coder.
    pub use_transform: bool,
    /// Every byte is the same and the block is long enough for the shortcut.
    pub degenerate: bool,
}

/// Classify a block. Deterministic, no side effects other than logging.
pub fn classify(block: &[u8], config: &CodecConfig) -> Classification {
    let degenerate = is_degenerate(block, config.min_degenerate_len);
    let sample = &block[..block.len().min(config.text_sample_len)];

    let structured = looks_structured(block, config);
    let ratio = text_ratio(sample);
    let use_transform = structured || (!sample.is_empty() && ratio >= config.text_ratio);

    debug!(
        "Classified {} bytes: degenerate {}, structured {}, text ratio {:.3}.",
        block.len(),
        degenerate,
        structured,
        ratio
    );
    Classification {
        use_transform,
        degenerate,
    }
}

/// True when the block is at least min_len long and every byte equals the first one.
pub fn is_degenerate(block: &[u8], min_len: usize) -> bool {
    match block.first() {
        Some(&first) if block.len() >= min_len.max(1) => block.iter().all(|&b| b == first),
        _ => false,
    }
}

/// Fraction of the sample made of printable ASCII or common whitespace control codes.
pub fn text_ratio(sample: &[u8]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let text = sample.iter().filter(|&&b| is_text_byte(b)).count();
    text as f64 / sample.len() as f64
}

#[inline(always)]
fn is_text_byte(b: u8) -> bool {
    matches!(b, 0x20..=0x7e | b'\t' | b'\n' | b'\r' | 0x0c)
}

/// Recognise delimited records (csv, tsv, pipe separated logs) or markup / json framing.
pub fn looks_structured(block: &[u8], config: &CodecConfig) -> bool {
    let sample = &block[..block.len().min(config.text_sample_len)];
    if sample.contains(&0) {
        return false;
    }
    has_markup_framing(block, config.text_sample_len)
        || has_consistent_delimiters(sample, block.len(), config)
}

/// Json objects or arrays, and xml-like markup: the first and last non-whitespace bytes match.
/// Only the first and last window bytes are searched.
fn has_markup_framing(block: &[u8], window: usize) -> bool {
    let tail_start = block.len().saturating_sub(window);
    let first = block[..block.len().min(window)]
        .iter()
        .position(|b| !b.is_ascii_whitespace());
    let last = block[tail_start..]
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|l| tail_start + l);
    match (first, last) {
        (Some(f), Some(l)) if l > f => matches!(
            (block[f], block[l]),
            (b'{', b'}') | (b'[', b']') | (b'<', b'>')
        ),
        _ => false,
    }
}

/// Every sampled line carries the same non-zero count of one of the configured delimiters.
fn has_consistent_delimiters(sample: &[u8], block_len: usize, config: &CodecConfig) -> bool {
    let mut pieces: Vec<&[u8]> = sample.split(|&b| b == b'\n').collect();
    // A sample cut short of the block ends part way through a line, so drop that piece.
    if sample.len() < block_len && sample.last() != Some(&b'\n') {
        pieces.pop();
    }

    let lines: Vec<&[u8]> = pieces
        .into_iter()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .take(config.structure_sample_lines)
        .collect();
    if lines.len() < config.structure_min_lines.max(2) {
        return false;
    }

    let counts: Vec<FxHashMap<u8, usize>> = lines
        .iter()
        .map(|line| {
            let mut count = FxHashMap::default();
            for &b in line.iter() {
                if config.delimiters.contains(&b) {
                    *count.entry(b).or_insert(0) += 1;
                }
            }
            count
        })
        .collect();

    config.delimiters.iter().any(|d| {
        let first = counts[0].get(d).copied().unwrap_or(0);
        first > 0 && counts.iter().all(|c| c.get(d).copied().unwrap_or(0) == first)
    })
}
