use log::{debug, error, trace};

use super::huffman_code_from_weights::code_len_from_weights;
use crate::bitstream::{bitpacker::BitPacker, bitreader::BitReader};
use crate::error::CodecError;
use crate::tools::{
    freq_count::freqs,
    symbol_map::{decode_sym_map, encode_sym_map},
};
use std::cmp::Ordering;

/// Longest code the coder will produce or accept. Fits the 5 bit origin and the out24 format.
pub const MAX_CODE_LEN: u8 = 20;

/// Canonical code for each byte value: (length, code). Length 0 means the byte has no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<(u8, u32)>,
}

impl CodeTable {
    /// Build the table for a frequency count (one u32 per byte value).
    pub fn from_freqs(freqs: &[u32]) -> Self {
        Self::canonical(&code_len_from_weights(freqs))
    }

    /// Build the table from code lengths read off a stream, rejecting lengths that do not
    /// form a complete prefix code.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self, CodecError> {
        validate_lengths(lengths)?;
        Ok(Self::canonical(lengths))
    }

    /// Assign canonical codes. Symbols sorted by (length, symbol) receive consecutive
    /// values within each length, shifting left whenever the length grows.
    fn canonical(lengths: &[u8]) -> Self {
        let mut codes = vec![(0_u8, 0_u32); 256];

        let mut len_sym: Vec<(u8, u8)> = lengths
            .iter()
            .enumerate()
            .take(256)
            .filter(|&(_, &len)| len > 0)
            .map(|(sym, &len)| (len, sym as u8))
            .collect();
        len_sym.sort_unstable();

        if let Some(&(first_len, _)) = len_sym.first() {
            /*
            Next_code is a tuple of the current length and the code to hand out next.

            When the length changes, do a shift left for each increment and continue. So
            for example, if the length is now 5 and the last code had a length of 3 and
            was 010, we would now start with 01000, 01001, 01010, etc.
            */
            let mut next_code: (u8, u32) = (first_len, 0);
            for &(len, sym) in &len_sym {
                if len != next_code.0 {
                    next_code.1 <<= len - next_code.0;
                    next_code.0 = len;
                }
                codes[sym as usize] = (len, next_code.1);
                next_code.1 += 1;
            }
        }
        Self { codes }
    }

    /// (length, code) for a byte value.
    pub fn code(&self, sym: u8) -> (u8, u32) {
        self.codes[sym as usize]
    }

    /// Code length per byte value.
    pub fn lengths(&self) -> Vec<u8> {
        self.codes.iter().map(|&(len, _)| len).collect()
    }

    /// The code in the BitPacker out24 format: length in the top byte, code in the low bits.
    #[inline(always)]
    fn packed(&self, sym: u8) -> u32 {
        let (len, code) = self.codes[sym as usize];
        (len as u32) << 24 | code
    }
}

/// Check code lengths against the Kraft equality. A single symbol with a 1 bit code is the
/// one incomplete table allowed.
fn validate_lengths(lengths: &[u8]) -> Result<(), CodecError> {
    let used: Vec<u8> = lengths.iter().copied().filter(|&l| l > 0).collect();
    if used.is_empty() {
        return Err(CodecError::InvalidCodeTable("no symbols in table".into()));
    }
    if let Some(&len) = used.iter().find(|&&l| l > MAX_CODE_LEN) {
        return Err(CodecError::InvalidCodeTable(format!(
            "code length {} exceeds {}",
            len, MAX_CODE_LEN
        )));
    }
    if used.len() == 1 {
        return match used[0] {
            1 => Ok(()),
            len => Err(CodecError::InvalidCodeTable(format!(
                "single symbol must have a 1 bit code, found {}",
                len
            ))),
        };
    }
    let kraft: u64 = used.iter().map(|&l| 1_u64 << (MAX_CODE_LEN - l)).sum();
    match kraft.cmp(&(1_u64 << MAX_CODE_LEN)) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(CodecError::InvalidCodeTable(
            "code lengths are over-subscribed".into(),
        )),
        Ordering::Less => Err(CodecError::InvalidCodeTable(
            "code lengths are incomplete".into(),
        )),
    }
}

/// Huffman encode a block. The stream holds the symbol map, the code lengths and then the
/// codes, zero padded to a byte boundary. The symbol count is not stored; the caller must
/// know it to decode. An empty block gives an empty stream.
pub fn huf_encode(block: &[u8]) -> Vec<u8> {
    if block.is_empty() {
        return Vec::new();
    }
    let table = CodeTable::from_freqs(&freqs(block));
    let mut bw = BitPacker::new(block.len() / 2 + 64);

    write_table(&mut bw, &table.lengths());
    trace!("Code table written, data starts at {}.", bw.loc());

    for &sym in block {
        bw.out24(table.packed(sym));
    }
    let out = bw.finish();
    debug!(
        "Huffman coded {} bytes into {} bytes.",
        block.len(),
        out.len()
    );
    out
}

/// Write the symbol map followed by the delta coded lengths of every symbol in the map.
fn write_table(bw: &mut BitPacker, lengths: &[u8]) {
    let used: Vec<bool> = lengths.iter().map(|&l| l > 0).collect();
    for word in encode_sym_map(&used) {
        bw.out16(word);
    }

    /*
    The lengths start with an "origin" length of five bits taken from the first symbol.

    Each symbol's length (INCLUDING THE FIRST SYMBOL) is then written as the difference
    from the previous one: 10 for +1 and 11 for -1, repeated as needed, ending with a
    single zero bit.
    */
    let mut origin = match lengths.iter().find(|&&l| l > 0) {
        Some(&l) => l,
        None => return,
    };
    bw.out24((5 << 24) | origin as u32);

    for &l in lengths.iter().filter(|&&l| l > 0) {
        let mut delta = l as i32 - origin as i32;
        origin = l;
        loop {
            match delta.cmp(&0) {
                Ordering::Greater => {
                    bw.out24(0x02_000002);
                    delta -= 1;
                }
                Ordering::Less => {
                    bw.out24(0x02_000003);
                    delta += 1;
                }
                Ordering::Equal => break,
            }
        }
        bw.out24(0x01_000000);
    }
}

/// Read the symbol map and code lengths written by write_table. Returns 256 lengths.
fn read_table(br: &mut BitReader<'_>) -> Result<Vec<u8>, CodecError> {
    let truncated = || CodecError::InvalidCodeTable("code table is truncated".into());

    let mut sym_map: Vec<u16> = vec![br.bint(16).ok_or_else(truncated)? as u16];
    for _ in 0..sym_map[0].count_ones() {
        sym_map.push(br.bint(16).ok_or_else(truncated)? as u16);
    }
    let symbols = decode_sym_map(&sym_map);
    if symbols.is_empty() {
        return Err(CodecError::InvalidCodeTable("symbol map is empty".into()));
    }

    let mut lengths = vec![0_u8; 256];
    let mut l = br.bint(5).ok_or_else(truncated)? as i32;
    for &sym in &symbols {
        while br.bool_bit().ok_or_else(truncated)? {
            // Found "11" - subtract 1, "10" - add 1
            if br.bool_bit().ok_or_else(truncated)? {
                l -= 1
            } else {
                l += 1
            }
            if !(0..=MAX_CODE_LEN as i32).contains(&l) {
                return Err(CodecError::InvalidCodeTable(format!(
                    "code length {} out of range for symbol {}",
                    l, sym
                )));
            }
        }
        if l < 1 || l > MAX_CODE_LEN as i32 {
            return Err(CodecError::InvalidCodeTable(format!(
                "code length {} out of range for symbol {}",
                l, sym
            )));
        }
        lengths[sym as usize] = l as u8;
    }
    Ok(lengths)
}

/// Decoding info for one code length: the first canonical code of that length, how many
/// codes have it, and where its symbols start in the sorted symbol list.
#[derive(Debug, Clone, Default)]
struct Level {
    start_code: u32,
    count: u32,
    offset: u32,
}

/// Canonical decoder rebuilt from code lengths.
struct Decoder {
    levels: Vec<Level>,
    symbols: Vec<u8>,
}

impl Decoder {
    /// Symbols in canonical order are (length, symbol) order, and the first code of each
    /// length comes straight from the table.
    fn new(table: &CodeTable) -> Self {
        let mut levels = vec![Level::default(); MAX_CODE_LEN as usize + 1];
        let mut symbols: Vec<(u8, u8)> = (0..=255_u8)
            .map(|sym| (table.code(sym).0, sym))
            .filter(|&(len, _)| len > 0)
            .collect();
        symbols.sort_unstable();

        for (offset, &(len, sym)) in symbols.iter().enumerate() {
            let level = &mut levels[len as usize];
            if level.count == 0 {
                level.start_code = table.code(sym).1;
                level.offset = offset as u32;
            }
            level.count += 1;
        }
        Self {
            levels,
            symbols: symbols.into_iter().map(|(_, sym)| sym).collect(),
        }
    }

    /// Descend the code tree one bit at a time until a leaf is reached.
    fn next_symbol(&self, br: &mut BitReader<'_>) -> Result<Option<u8>, CodecError> {
        let mut code = 0_u32;
        for level in self.levels.iter().skip(1) {
            let bit = match br.bit() {
                Some(bit) => bit as u32,
                None => return Ok(None),
            };
            code = code << 1 | bit;
            if code >= level.start_code && code - level.start_code < level.count {
                return Ok(Some(
                    self.symbols[(level.offset + code - level.start_code) as usize],
                ));
            }
        }
        Err(CodecError::InvalidFormat(format!(
            "no code matches the bits before {}",
            br.loc()
        )))
    }
}

/// Decode exactly target_len symbols from a stream produced by huf_encode.
pub fn huf_decode(stream: &[u8], target_len: usize) -> Result<Vec<u8>, CodecError> {
    if target_len == 0 {
        return Ok(Vec::new());
    }
    if stream.is_empty() {
        error!("Empty entropy stream, expected {} symbols.", target_len);
        return Err(CodecError::InvalidFormat("entropy stream is empty".into()));
    }

    let mut br = BitReader::new(stream);
    let table = CodeTable::from_lengths(&read_table(&mut br)?)?;
    trace!("Code table read, data starts at {}.", br.loc());
    let decoder = Decoder::new(&table);

    let mut out = Vec::with_capacity(target_len);
    while out.len() < target_len {
        match decoder.next_symbol(&mut br)? {
            Some(sym) => out.push(sym),
            None => {
                error!(
                    "Entropy stream ended after {} of {} symbols.",
                    out.len(),
                    target_len
                );
                return Err(CodecError::InvalidFormat(format!(
                    "entropy stream ended after {} of {} symbols",
                    out.len(),
                    target_len
                )));
            }
        }
    }
    debug!(
        "Huffman decoded {} symbols, {} bits left over.",
        out.len(),
        br.remaining()
    );
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn lengths_of(pairs: &[(u8, u8)]) -> Vec<u8> {
        let mut l = vec![0_u8; 256];
        pairs.iter().for_each(|&(s, len)| l[s as usize] = len);
        l
    }

    #[test]
    fn canonical_codes_test() {
        let table = CodeTable::from_lengths(&lengths_of(&[
            (b'a', 2),
            (b'b', 1),
            (b'c', 3),
            (b'd', 3),
        ]))
        .unwrap();
        assert_eq!(table.code(b'b'), (1, 0b0));
        assert_eq!(table.code(b'a'), (2, 0b10));
        assert_eq!(table.code(b'c'), (3, 0b110));
        assert_eq!(table.code(b'd'), (3, 0b111));
        assert_eq!(table.code(b'e'), (0, 0));
    }

    #[test]
    fn prefix_free_test() {
        let block = "the quick brown fox jumps over the lazy dog".as_bytes();
        let table = CodeTable::from_freqs(&freqs(block));
        let codes: Vec<(u8, u32)> = (0..=255_u8)
            .map(|s| table.code(s))
            .filter(|&(l, _)| l > 0)
            .collect();
        for (i, &(la, ca)) in codes.iter().enumerate() {
            for (j, &(lb, cb)) in codes.iter().enumerate() {
                if i != j && la <= lb {
                    assert_ne!(cb >> (lb - la), ca, "code {:b} prefixes {:b}", ca, cb);
                }
            }
        }
    }

    #[test]
    fn rebuilt_from_lengths_test() {
        let block = "abracadabra, alakazam".as_bytes();
        let table = CodeTable::from_freqs(&freqs(block));
        assert_eq!(CodeTable::from_lengths(&table.lengths()).unwrap(), table);
    }

    #[test]
    fn invalid_tables_test() {
        assert!(matches!(
            CodeTable::from_lengths(&lengths_of(&[(1, 1), (2, 1), (3, 1)])),
            Err(CodecError::InvalidCodeTable(_))
        ));
        assert!(matches!(
            CodeTable::from_lengths(&lengths_of(&[(1, 2), (2, 2), (3, 2)])),
            Err(CodecError::InvalidCodeTable(_))
        ));
        assert!(matches!(
            CodeTable::from_lengths(&lengths_of(&[(1, 3)])),
            Err(CodecError::InvalidCodeTable(_))
        ));
        assert!(matches!(
            CodeTable::from_lengths(&[0; 256]),
            Err(CodecError::InvalidCodeTable(_))
        ));
        assert!(CodeTable::from_lengths(&lengths_of(&[(9, 1)])).is_ok());
    }

    #[test]
    fn decoder_levels_from_table_test() {
        let table = CodeTable::from_lengths(&lengths_of(&[
            (b'a', 2),
            (b'b', 1),
            (b'c', 3),
            (b'd', 3),
        ]))
        .unwrap();
        let decoder = Decoder::new(&table);
        assert_eq!(decoder.symbols, b"bacd".to_vec());
        assert_eq!(
            (decoder.levels[1].start_code, decoder.levels[1].count),
            (0b0, 1)
        );
        assert_eq!(
            (decoder.levels[3].start_code, decoder.levels[3].count, decoder.levels[3].offset),
            (0b110, 2, 2)
        );
        // 0 | 10 | 110 | 111
        let stream = [0b0101_1011, 0b1000_0000];
        let mut br = BitReader::new(&stream);
        let decoded: Vec<u8> = (0..4)
            .map(|_| decoder.next_symbol(&mut br).unwrap().unwrap())
            .collect();
        assert_eq!(decoded, b"bacd".to_vec());
    }

    #[test]
    fn empty_test() {
        assert!(huf_encode(&[]).is_empty());
        assert_eq!(huf_decode(&[], 0).unwrap(), Vec::<u8>::new());
        assert!(matches!(
            huf_decode(&[], 3),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn single_symbol_stream_test() {
        // Map index 0x0800 (block 4), map 0x0004 (byte 77 'M'), origin 00001, delta 0,
        // then three 0 bits of data.
        let stream = huf_encode(b"MMM");
        assert_eq!(stream, vec![0x08, 0x00, 0x00, 0x04, 0x08, 0x00]);
        assert_eq!(huf_decode(&stream, 3).unwrap(), b"MMM".to_vec());
    }

    #[test]
    fn round_trip_test() {
        let block = "It was the best of times, it was the worst of times".as_bytes();
        let stream = huf_encode(block);
        assert!(stream.len() < block.len());
        assert_eq!(huf_decode(&stream, block.len()).unwrap(), block);
    }

    #[test]
    fn all_byte_values_test() {
        let block: Vec<u8> = (0..4096_u32).map(|i| (i * 7 % 256) as u8).collect();
        let stream = huf_encode(&block);
        assert_eq!(huf_decode(&stream, block.len()).unwrap(), block);
    }

    #[test]
    fn deterministic_test() {
        let block = "mississippi river banks".as_bytes();
        assert_eq!(huf_encode(block), huf_encode(block));
        assert_eq!(
            CodeTable::from_freqs(&freqs(block)),
            CodeTable::from_freqs(&freqs(block))
        );
    }

    #[test]
    fn short_stream_test() {
        let block = "abcabcabcabc".as_bytes();
        let stream = huf_encode(block);
        assert!(matches!(
            huf_decode(&stream, block.len() + 16),
            Err(CodecError::InvalidFormat(_))
        ));
        assert!(matches!(
            huf_decode(&stream[..2], block.len()),
            Err(CodecError::InvalidCodeTable(_))
        ));
    }

    #[test]
    fn bad_length_in_stream_test() {
        // Symbol map for byte 0 and 1, origin 0 and no deltas: length 0 is not a code.
        let stream = [0x80, 0x00, 0xc0, 0x00, 0x00, 0x00];
        assert!(matches!(
            huf_decode(&stream, 1),
            Err(CodecError::InvalidCodeTable(_))
        ));
    }
}
