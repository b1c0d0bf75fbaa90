use super::rank_doubling::rotation_order;
use crate::error::CodecError;
use crate::tools::freq_count::freqs;
use log::{debug, info};

/// Output of the forward transform: the last column of the sorted rotations, plus the rank of
/// the rotation that starts at offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub permuted: Vec<u8>,
    pub primary_index: u32,
}

/// Burrows-Wheeler-Transform. Blocks shorter than small_sort_threshold compare rotations
/// directly, longer blocks use rank doubling. Blocks of 0 or 1 bytes come back unchanged
/// with a primary index of 0.
pub fn bwt_encode(block: &[u8], small_sort_threshold: usize) -> TransformResult {
    if block.len() < 2 {
        return TransformResult {
            permuted: block.to_vec(),
            primary_index: 0,
        };
    }

    let index = if block.len() < small_sort_threshold {
        info!("Using native rotation sort.");
        // Create index into block. Index is u32, which should be more than enough
        let mut index = (0_u32..block.len() as u32).collect::<Vec<u32>>();
        // Stable, so identical rotations stay in offset order
        index.sort_by(|a, b| block_compare(*a as usize, *b as usize, block));
        index
    } else {
        info!("Using rank doubling rotation sort.");
        rotation_order(block)
    };

    // Get key and BWT output
    let mut key = 0_u32;
    let mut bwt = vec![0; block.len()];
    for (i, &start) in index.iter().enumerate() {
        if start == 0 {
            key = i as u32;
            bwt[i] = block[block.len() - 1];
        } else {
            bwt[i] = block[(start as usize) - 1];
        }
    }
    debug!("BWT of {} bytes, primary index {}.", block.len(), key);
    TransformResult {
        permuted: bwt,
        primary_index: key,
    }
}

/// compare the next two chunks of the original data to decide which sorts first
fn block_compare(a: usize, b: usize, block: &[u8]) -> std::cmp::Ordering {
    let min = std::cmp::min(block[a..].len(), block[b..].len());

    // Lexicographical comparison
    let mut result = block[a..a + min].cmp(&block[b..b + min]);

    // Implement wraparound if needed
    if result == std::cmp::Ordering::Equal {
        if a < b {
            let to_end = block.len() - a - min;
            result = block[(a + min)..].cmp(&block[..to_end]);
            if result == std::cmp::Ordering::Equal {
                let rest_of_block = block.len() - to_end - min;
                return block[..rest_of_block].cmp(&block[to_end..(to_end + rest_of_block)]);
            }
        } else {
            let to_end = block.len() - b - min;
            result = block[..to_end].cmp(&block[(b + min)..]);
            if result == std::cmp::Ordering::Equal {
                let rest_of_block = block.len() - to_end - min;
                return block[to_end..(to_end + rest_of_block)].cmp(&block[..rest_of_block]);
            }
        }
    }
    result
}

/// Decode a Burrows-Wheeler-Transform by walking the last-to-first mapping backwards from
/// the primary index, filling the output from its end.
pub fn bwt_decode(primary_index: u32, bwt_in: &[u8]) -> Result<Vec<u8>, CodecError> {
    let end = bwt_in.len();
    if end == 0 {
        return match primary_index {
            0 => Ok(Vec::new()),
            _ => Err(CodecError::CorruptTransform(format!(
                "primary index {} given for an empty block",
                primary_index
            ))),
        };
    }
    if primary_index as usize >= end {
        return Err(CodecError::CorruptTransform(format!(
            "primary index {} out of range for {} bytes",
            primary_index, end
        )));
    }

    // Convert frequency count to a cumulative sum of frequencies. freq[s] is then the row
    // in the first column where s first appears.
    let freq_in = freqs(bwt_in);
    let mut freq = [0_u32; 256];
    for i in 0..255 {
        freq[i + 1] = freq[i] + freq_in[i];
    }

    // lf[i] is the row whose rotation starts one byte before the rotation in row i.
    let mut lf = vec![0_u32; end];
    for (i, &s) in bwt_in.iter().enumerate() {
        lf[i] = freq[s as usize];
        freq[s as usize] += 1
    }

    // A valid block has one LF cycle through every row, so the walk must come back to the
    // primary index after exactly end steps and not before.
    let start = primary_index as usize;
    let mut out = vec![0_u8; end];
    let mut row = start;
    for (step, slot) in out.iter_mut().rev().enumerate() {
        *slot = bwt_in[row];
        row = lf[row] as usize;
        if row == start && step + 1 < end {
            return Err(CodecError::CorruptTransform(format!(
                "last-to-first mapping cycles after {} of {} bytes",
                step + 1,
                end
            )));
        }
    }
    if row != start {
        return Err(CodecError::CorruptTransform(format!(
            "last-to-first mapping does not return to primary index {}",
            primary_index
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    const NATIVE: usize = usize::MAX;
    const DOUBLING: usize = 0;

    fn lcg_bytes(len: usize, seed: u64, modulus: u8) -> Vec<u8> {
        let mut rng = seed;
        (0..len)
            .map(|_| {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((rng >> 56) as u8) % modulus
            })
            .collect()
    }

    #[test]
    fn banana_test() {
        for threshold in [NATIVE, DOUBLING] {
            let result = bwt_encode(b"banana", threshold);
            assert_eq!(result.permuted, b"nnbaaa".to_vec());
            assert_eq!(result.primary_index, 3);
        }
    }

    #[test]
    fn short_blocks_test() {
        assert_eq!(
            bwt_encode(b"", NATIVE),
            TransformResult {
                permuted: vec![],
                primary_index: 0
            }
        );
        assert_eq!(
            bwt_encode(b"x", DOUBLING),
            TransformResult {
                permuted: b"x".to_vec(),
                primary_index: 0
            }
        );
        assert_eq!(bwt_decode(0, b"").unwrap(), Vec::<u8>::new());
        assert_eq!(bwt_decode(0, b"x").unwrap(), b"x".to_vec());
    }

    #[test]
    fn sorts_agree_test() {
        for modulus in [2, 4, 255] {
            let block = lcg_bytes(3000, 7, modulus);
            assert_eq!(bwt_encode(&block, NATIVE), bwt_encode(&block, DOUBLING));
        }
        let block = "to be or not to be, that is the question. ".repeat(40);
        assert_eq!(
            bwt_encode(block.as_bytes(), NATIVE),
            bwt_encode(block.as_bytes(), DOUBLING)
        );
    }

    #[test]
    fn round_trip_test() {
        let mut blocks = vec![
            b"If Peter Piper picked a peck of pickled peppers".to_vec(),
            b"abababababab".to_vec(),
            vec![0x41; 5000],
            lcg_bytes(20_000, 42, 255),
            lcg_bytes(20_000, 43, 3),
        ];
        blocks.push((0..=255).collect());
        for block in blocks {
            let result = bwt_encode(&block, 4096);
            assert_eq!(
                bwt_decode(result.primary_index, &result.permuted).unwrap(),
                block
            );
        }
    }

    #[test]
    fn clusters_runs_test() {
        let block = "the cat sat on the mat, the cat sat on the hat. ".repeat(10);
        let result = bwt_encode(block.as_bytes(), 4096);
        let runs = |d: &[u8]| d.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(runs(&result.permuted) < runs(block.as_bytes()));
    }

    #[test]
    fn split_lf_cycles_test() {
        // "abab" is not the last column of any block: its LF mapping is two cycles.
        for key in 0..4 {
            assert!(matches!(
                bwt_decode(key, b"abab"),
                Err(CodecError::CorruptTransform(_))
            ));
        }
        assert_eq!(bwt_decode(3, b"nnbaaa").unwrap(), b"banana".to_vec());
    }

    #[test]
    fn bad_primary_index_test() {
        assert!(matches!(
            bwt_decode(6, b"nnbaaa"),
            Err(CodecError::CorruptTransform(_))
        ));
        assert!(matches!(
            bwt_decode(1, b""),
            Err(CodecError::CorruptTransform(_))
        ));
    }
}
