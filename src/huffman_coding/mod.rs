//! The huffman module is the entropy coding stage.
//!
//! One code table is built per block from that block's byte frequencies. Only the code
//! lengths travel with the data: the table is canonical, so the decoder rebuilds the exact
//! codes from the lengths alone. The lengths are written ahead of the coded symbols using a
//! symbol map of the byte values in use and a run of small length deltas.
//!
//! Nothing is cached between blocks. A table is only valid for the distribution it was
//! built from.
//!

pub mod huffman;
pub mod huffman_code_from_weights;
