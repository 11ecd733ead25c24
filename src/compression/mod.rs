//! The compression module runs whole compression and decompression sessions.
//!
//! Compression happens in the following steps:
//! - Pass 1: Run the input through the zero-run escape transform and count every symbol, plus one EOF.
//! - Build the optimal code tree from those counts and reduce it to canonical code lengths.
//! - Write the header: 322 code lengths of 8 bits each.
//! - Pass 2: Run the same transform again and write the code for each symbol, then EOF, then zero
//!   padding to the next byte.
//!
//! Decompression follows the inverse of the compression process.
//! - Read the 322 code lengths and rebuild the canonical code tree.
//! - Decode symbols until EOF, writing literal bytes and expanding zero-run escapes.
//!
//! Output files are staged and only renamed into place once the session succeeds.
//!

pub mod compress;
pub mod decompress;
