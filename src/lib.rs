//! Static canonical Huffman compression with zero-run escapes.
//!
//! Version 0.1.0
//!
//! Compresses a file in two passes: one to count symbols, one to encode them. The alphabet has 322
//! symbols: the 256 byte values, an end of stream marker, and 65 escape symbols that each stand for a
//! run of 2^i zero bytes. Long runs of zeros therefore cost a handful of codes instead of one code per
//! byte. Only the canonical code lengths are stored, so the header is a fixed 322 bytes.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffzip test.bin`
//!
//! This will compress the file and create the file test.bin.hz. `huffzip -d test.bin.hz` restores it.
//!
pub mod alphabet;
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, compress_bytes, CompressStats};
pub use compression::decompress::{decompress, decompress_bytes};
pub use error::{HuffError, Result};
