//! The tools module provides the helper functions used by the codec and the command line.
//!
//! The tools are:
//! - classify: Decide between the repeated-byte shortcut, the block transform and plain coding.
//! - cli: Command line interface.
//! - crc: CRC32 checksum over the container payload.
//! - freq_count: Byte frequency count.
//! - symbol_map: Encode and decode the map of byte values used by a huffman table.
//!
pub mod classify;
pub mod cli;
pub mod crc;
pub mod freq_count;
pub mod symbol_map;
