//! The bitstream module is the bit-level I/O subsystem used by the huffman coder.
//!
//! `BitPacker` packs variable length codes most-significant-bit first into a byte buffer,
//! padding the final byte with zeros. `BitReader` walks the same layout back one bit (or
//! a few bits) at a time.
//!
//! Both work entirely in memory. The container module owns the byte framing around them.
pub mod bitpacker;
pub mod bitreader;
