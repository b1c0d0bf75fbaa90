use log::{debug, error, info, warn};

use super::config::CodecConfig;
use super::container::{unframe, Encoding};
use super::progress::{report, ProgressObserver, Stage};
use crate::bwt_algorithms::bwt_sort::bwt_decode;
use crate::error::{CodecError, Warning};
use crate::huffman_coding::huffman::huf_decode;

/// Verify and decode a serialized container.
///
/// The checksum is verified before anything else is decoded. A rebuilt block longer than the
/// recorded size is truncated to it, a shorter one is returned as is. Either way the caller
/// gets a `Warning::SizeMismatch`.
pub fn decompress(
    bytes: &[u8],
    config: &CodecConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<(Vec<u8>, Vec<Warning>), CodecError> {
    restore(bytes, config, progress).map_err(|e| {
        error!("Decompression of {} bytes failed: {}", bytes.len(), e);
        e
    })
}

fn restore(
    bytes: &[u8],
    config: &CodecConfig,
    progress: &mut dyn ProgressObserver,
) -> Result<(Vec<u8>, Vec<Warning>), CodecError> {
    let container = unframe(bytes)?;
    let header = container.header;
    let expected = header.original_size as usize;
    if expected > config.max_input_size {
        return Err(CodecError::InputTooLarge {
            size: expected as u64,
            max: config.max_input_size as u64,
        });
    }
    let encoding = header.encoding();
    info!(
        "Found a valid container: {} bytes, {:?} encoding.",
        expected, encoding
    );
    report(progress, Stage::Unframed);

    let payload = container.payload;
    let mut out = match encoding {
        Encoding::Raw => {
            report(progress, Stage::EntropyDecoded);
            payload
        }
        Encoding::Degenerate => {
            let byte = huf_decode(&payload, 1)?
                .first()
                .copied()
                .ok_or_else(|| CodecError::InvalidFormat("missing repeated byte".into()))?;
            report(progress, Stage::EntropyDecoded);
            debug!("Repeating {:#04x} {} times.", byte, expected);
            vec![byte; expected]
        }
        Encoding::Transform => {
            if payload.len() < 4 {
                return Err(CodecError::InvalidFormat(
                    "transform payload is missing its primary index".into(),
                ));
            }
            let key = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            debug!("Primary index is {}.", key);
            let permuted = huf_decode(&payload[4..], expected)?;
            report(progress, Stage::EntropyDecoded);
            bwt_decode(key, &permuted)?
        }
        Encoding::Direct => {
            let decoded = huf_decode(&payload, expected)?;
            report(progress, Stage::EntropyDecoded);
            decoded
        }
    };
    report(progress, Stage::Restored);

    let mut warnings = Vec::new();
    if out.len() != expected {
        warn!(
            "Rebuilt {} bytes but the container records {}.",
            out.len(),
            expected
        );
        warnings.push(Warning::SizeMismatch {
            expected,
            actual: out.len(),
        });
        out.truncate(expected);
    }
    report(progress, Stage::Done);
    Ok((out, warnings))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::compress;
    use crate::compression::container::{frame, FLAG_RAW, FLAG_TRANSFORM, HEADER_SIZE};
    use crate::compression::progress::NoProgress;
    use crate::huffman_coding::huffman::huf_encode;

    fn round_trip(block: &[u8]) -> Vec<u8> {
        let config = CodecConfig::default();
        let bytes = compress(block, &config, &mut NoProgress).unwrap().to_bytes();
        let (out, warnings) = decompress(&bytes, &config, &mut NoProgress).unwrap();
        assert!(warnings.is_empty());
        out
    }

    #[test]
    fn round_trip_paths_test() {
        let text = "col_a,col_b,col_c\n1,2,3\n4,5,6\n7,8,9\n".repeat(5);
        let binary: Vec<u8> = (0..2000_u32).map(|i| (i % 17 * 13) as u8).collect();
        for block in [
            vec![],
            vec![9],
            vec![0x41; 10_000],
            text.into_bytes(),
            binary,
        ] {
            assert_eq!(round_trip(&block), block);
        }
    }

    #[test]
    fn raw_longer_than_recorded_test() {
        let bytes = frame(b"abcdef".to_vec(), 4, FLAG_RAW).to_bytes();
        let (out, warnings) =
            decompress(&bytes, &CodecConfig::default(), &mut NoProgress).unwrap();
        assert_eq!(out, b"abcd".to_vec());
        assert_eq!(
            warnings,
            vec![Warning::SizeMismatch {
                expected: 4,
                actual: 6
            }]
        );
    }

    #[test]
    fn raw_shorter_than_recorded_test() {
        let bytes = frame(b"ab".to_vec(), 5, FLAG_RAW).to_bytes();
        let (out, warnings) =
            decompress(&bytes, &CodecConfig::default(), &mut NoProgress).unwrap();
        assert_eq!(out, b"ab".to_vec());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn raw_ignores_transform_bit_test() {
        let bytes = frame(b"plain".to_vec(), 5, FLAG_RAW | FLAG_TRANSFORM).to_bytes();
        let (out, _) = decompress(&bytes, &CodecConfig::default(), &mut NoProgress).unwrap();
        assert_eq!(out, b"plain".to_vec());
    }

    #[test]
    fn forged_primary_index_test() {
        let mut payload = 99_u32.to_be_bytes().to_vec();
        payload.extend(huf_encode(b"nnbaaa"));
        let bytes = frame(payload, 6, FLAG_TRANSFORM).to_bytes();
        assert!(matches!(
            decompress(&bytes, &CodecConfig::default(), &mut NoProgress),
            Err(CodecError::CorruptTransform(_))
        ));
    }

    #[test]
    fn split_lf_cycles_with_valid_checksum_test() {
        // The checksum covers the forged payload, so only the inverse transform can object.
        let mut payload = 0_u32.to_be_bytes().to_vec();
        payload.extend(huf_encode(b"abab"));
        let bytes = frame(payload, 4, FLAG_TRANSFORM).to_bytes();
        assert!(matches!(
            decompress(&bytes, &CodecConfig::default(), &mut NoProgress),
            Err(CodecError::CorruptTransform(_))
        ));
    }

    #[test]
    fn short_transform_payload_test() {
        let bytes = frame(vec![0, 0], 6, FLAG_TRANSFORM).to_bytes();
        assert!(matches!(
            decompress(&bytes, &CodecConfig::default(), &mut NoProgress),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn recorded_size_over_limit_test() {
        let config = CodecConfig {
            max_input_size: 100,
            ..CodecConfig::default()
        };
        let bytes = frame(huf_encode(b"x"), 1_000_000, 0x02).to_bytes();
        assert!(matches!(
            decompress(&bytes, &config, &mut NoProgress),
            Err(CodecError::InputTooLarge { .. })
        ));
    }

    #[test]
    fn corrupt_checksum_test() {
        let mut bytes = compress(b"checksum me please", &CodecConfig::default(), &mut NoProgress)
            .unwrap()
            .to_bytes();
        bytes[HEADER_SIZE - 1] ^= 0xff;
        assert!(matches!(
            decompress(&bytes, &CodecConfig::default(), &mut NoProgress),
            Err(CodecError::Integrity { .. })
        ));
    }

    #[test]
    fn progress_order_test() {
        let config = CodecConfig::default();
        let bytes = compress(b"some text, some text", &config, &mut NoProgress)
            .unwrap()
            .to_bytes();
        let mut seen = vec![];
        let mut observer = |stage: Stage, fraction: f32| seen.push((stage, fraction));
        decompress(&bytes, &config, &mut observer).unwrap();
        let stages: Vec<Stage> = seen.iter().map(|&(s, _)| s).collect();
        assert_eq!(
            stages,
            vec![
                Stage::Unframed,
                Stage::EntropyDecoded,
                Stage::Restored,
                Stage::Done
            ]
        );
        assert!(seen.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
