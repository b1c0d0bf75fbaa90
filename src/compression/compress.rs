use log::{debug, info};

use super::config::CodecConfig;
use super::container::{frame, Container, Encoding};
use super::progress::{report, ProgressObserver, Stage};
use crate::bwt_algorithms::bwt_sort::bwt_encode;
use crate::error::CodecError;
use crate::huffman_coding::huffman::huf_encode;
use crate::tools::classify::classify;

/// Compress one block into a container.
///
/// The block is rejected before any work if it is larger than config.max_input_size (or
/// than the 4 byte size field can record). If the encoded payload is not at most
/// config.acceptance_ratio of the input, the input is stored raw instead, so the container
/// is never more than the header larger than the input.
pub fn compress(
    block: &[u8],
    config: &CodecConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<Container, CodecError> {
    let max = config.max_input_size.min(u32::MAX as usize);
    if block.len() > max {
        return Err(CodecError::InputTooLarge {
            size: block.len() as u64,
            max: max as u64,
        });
    }

    let class = classify(block, config);
    report(progress, Stage::Classified);

    let (encoding, payload) = if class.degenerate {
        info!(
            "Block of {} bytes is a single repeated byte {:#04x}.",
            block.len(),
            block[0]
        );
        report(progress, Stage::Transformed);
        (Encoding::Degenerate, huf_encode(&block[..1]))
    } else if class.use_transform {
        info!("Using the block transform for {} bytes.", block.len());
        let result = bwt_encode(block, config.small_sort_threshold);
        report(progress, Stage::Transformed);
        let coded = huf_encode(&result.permuted);
        let mut payload = Vec::with_capacity(4 + coded.len());
        payload.extend_from_slice(&result.primary_index.to_be_bytes());
        payload.extend_from_slice(&coded);
        (Encoding::Transform, payload)
    } else {
        info!("Entropy coding {} bytes directly.", block.len());
        report(progress, Stage::Transformed);
        (Encoding::Direct, huf_encode(block))
    };
    report(progress, Stage::EntropyCoded);

    let (encoding, payload) =
        if is_effective(payload.len(), block.len(), config.acceptance_ratio) {
            debug!(
                "Encoded {} bytes into {} ({:?}).",
                block.len(),
                payload.len(),
                encoding
            );
            (encoding, payload)
        } else {
            info!(
                "Encoding gave {} bytes for {} input bytes. Storing raw.",
                payload.len(),
                block.len()
            );
            (Encoding::Raw, block.to_vec())
        };

    let container = frame(payload, block.len() as u32, encoding.flags());
    report(progress, Stage::Framed);
    Ok(container)
}

/// True when encoded is small enough, relative to original, to be worth keeping.
/// An empty original is always stored raw.
pub fn is_effective(encoded: usize, original: usize, acceptance_ratio: f64) -> bool {
    original > 0 && encoded as f64 <= acceptance_ratio * original as f64
}
