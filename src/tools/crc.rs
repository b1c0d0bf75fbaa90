//! CRC-32 as used by bzip2: polynomial 0x04c11db7, processed most significant bit first,
//! initial value and final xor of 0xffffffff.
//!
//! `do_crc` is streaming. Feeding a buffer in pieces gives the same value as feeding it whole,
//! so the running crc can be carried across any split of the data.

const POLY: u32 = 0x04c1_1db7;

/// Lookup table for one byte at a time processing. Built at compile time.
const CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0_u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Continue a crc over data. Start with a crc of 0.
pub fn do_crc(crc: u32, data: &[u8]) -> u32 {
    let mut crc = !crc;
    for &byte in data {
        crc = (crc << 8) ^ CRC_TABLE[((crc >> 24) ^ byte as u32) as usize];
    }
    !crc
}

#[cfg(test)]
mod test {
    use super::do_crc;

    #[test]
    fn check_value_test() {
        // Standard check value for CRC-32/BZIP2
        assert_eq!(do_crc(0, b"123456789"), 0xfc89_1918);
    }

    #[test]
    fn empty_test() {
        assert_eq!(do_crc(0, &[]), 0);
    }

    #[test]
    fn streaming_test() {
        let data = "Making a silly test. Making a silly test.".as_bytes();
        let whole = do_crc(0, data);
        for split in [0, 1, 7, 20, data.len()] {
            let part = do_crc(0, &data[..split]);
            assert_eq!(do_crc(part, &data[split..]), whole);
        }
    }

    #[test]
    fn single_bit_flip_test() {
        let data = vec![0x5a_u8; 64];
        let base = do_crc(0, &data);
        for bit in 0..64 * 8 {
            let mut flipped = data.clone();
            flipped[bit / 8] ^= 1 << (bit % 8);
            assert_ne!(do_crc(0, &flipped), base, "bit {} went undetected", bit);
        }
    }
}
