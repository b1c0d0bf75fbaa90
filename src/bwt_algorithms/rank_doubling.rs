//! Cyclic rotation sort by prefix doubling.
//!
//! Round k ranks every rotation by its first 2^k bytes, using the ranks of round k-1 as a
//! pair of radix keys. Each round is two counting sort passes, and there are at most
//! log2(n) rounds. Working memory is five u32 vecs of the block length.

/// Returns the starting offsets of all rotations of block in sorted order. Identical
/// rotations are ordered by offset ascending.
pub fn rotation_order(block: &[u8]) -> Vec<u32> {
    let n = block.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order = vec![0_u32; n];
    let mut class = vec![0_u32; n];
    let mut count = vec![0_u32; n.max(256)];

    // Round 0: counting sort on the first byte.
    block.iter().for_each(|&b| count[b as usize] += 1);
    for i in 1..256 {
        count[i] += count[i - 1];
    }
    for i in (0..n).rev() {
        let b = block[i] as usize;
        count[b] -= 1;
        order[count[b] as usize] = i as u32;
    }
    let mut classes = 1_u32;
    for i in 1..n {
        if block[order[i] as usize] != block[order[i - 1] as usize] {
            classes += 1;
        }
        class[order[i] as usize] = classes - 1;
    }

    let mut shifted = vec![0_u32; n];
    let mut next_class = vec![0_u32; n];
    let mut span = 1_usize;
    while span < n && (classes as usize) < n {
        // Order by the second half: step each rotation back by span.
        for i in 0..n {
            shifted[i] = ((order[i] as usize + n - span) % n) as u32;
        }
        // Stable counting sort on the first half.
        count[..classes as usize].iter_mut().for_each(|c| *c = 0);
        shifted
            .iter()
            .for_each(|&s| count[class[s as usize] as usize] += 1);
        for i in 1..classes as usize {
            count[i] += count[i - 1];
        }
        for &s in shifted.iter().rev() {
            let c = class[s as usize] as usize;
            count[c] -= 1;
            order[count[c] as usize] = s;
        }

        // Re-rank on the (first half, second half) pair.
        next_class[order[0] as usize] = 0;
        classes = 1;
        for i in 1..n {
            let cur = order[i] as usize;
            let prev = order[i - 1] as usize;
            if class[cur] != class[prev] || class[(cur + span) % n] != class[(prev + span) % n] {
                classes += 1;
            }
            next_class[cur] = classes - 1;
        }
        std::mem::swap(&mut class, &mut next_class);
        span <<= 1;
    }

    // Classes now compare whole rotations. Lay them out by (class, offset).
    count[..classes as usize].iter_mut().for_each(|c| *c = 0);
    class.iter().for_each(|&c| count[c as usize] += 1);
    for i in 1..classes as usize {
        count[i] += count[i - 1];
    }
    for i in (0..n).rev() {
        let c = class[i] as usize;
        count[c] -= 1;
        order[count[c] as usize] = i as u32;
    }
    order
}
