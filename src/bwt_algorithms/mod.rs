//! The bwt_algorithms module is the block sorting subsystem.
//!
//! The Burrows-Wheeler Transform (BWT) sorts every cyclic rotation of a block and keeps the last
//! column of the sorted rotations. Equal byte values end up next to each other, which is what
//! the huffman stage feeds on.
//!
//! Two sorts are provided. Small blocks compare rotations directly. Larger blocks use rank
//! doubling over cyclic shifts, which stays O(n log n) however repetitive the data is.
//! Both order identical rotations by their starting offset.
//!
pub mod bwt_sort;
pub mod rank_doubling;
