//! The huffman module builds and applies static canonical Huffman codes over the 322 symbol alphabet.
//!
//! - frequency_table: counts symbols and merges them into an optimal code tree.
//! - code_tree: the immutable tree, with the bit path to every leaf.
//! - canonical_code: reduces a tree to code lengths (all that is stored in the file) and rebuilds the
//!   canonical tree from those lengths.
//! - huffman: the encoder and decoder that walk the tree over a bit stream.
//!
//! The same lengths always give the same tree, so the decoder never needs the encoder's tree shape.
//!

pub mod canonical_code;
pub mod code_tree;
pub mod frequency_table;
pub mod huffman;
