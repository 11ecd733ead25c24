//! Canonical Huffman codes.
//!
//! Only the code length of each symbol crosses the wire. Both sides rebuild the same codes from those
//! lengths: shorter codes come first, and codes of equal length are handed out in increasing symbol
//! order.

use log::trace;

use super::code_tree::{CodeTree, Node};
use crate::error::{HuffError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    /// Code length of each symbol. 0 marks a symbol without a code.
    code_lengths: Vec<u32>,
}

impl CanonicalCode {
    /// Create a canonical code from a list of code lengths, checking that they describe a complete
    /// prefix code. (A corrupt header fails here.)
    pub fn from_lengths(code_lengths: Vec<u32>) -> Result<Self> {
        if code_lengths.len() < 2 {
            return Err(HuffError::format("at least 2 symbols are needed"));
        }

        // Walk the lengths from deepest to shallowest, pairing up nodes at each level. A complete tree
        // pairs evenly at every level and ends with exactly one root.
        let mut sorted: Vec<u32> = code_lengths.iter().copied().filter(|&l| l > 0).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        let mut level = sorted.first().copied().unwrap_or(0);
        let mut nodes_at_level: u64 = 0;
        for &len in &sorted {
            while len < level {
                if nodes_at_level % 2 != 0 {
                    return Err(HuffError::format("under-full Huffman code tree"));
                }
                nodes_at_level /= 2;
                level -= 1;
            }
            nodes_at_level += 1;
        }
        while level > 0 {
            if nodes_at_level % 2 != 0 {
                return Err(HuffError::format("under-full Huffman code tree"));
            }
            nodes_at_level /= 2;
            level -= 1;
        }
        match nodes_at_level {
            0 => Err(HuffError::format("under-full Huffman code tree")),
            1 => Ok(Self { code_lengths }),
            _ => Err(HuffError::format("over-full Huffman code tree")),
        }
    }

    /// Create a canonical code from the leaf depths of a code tree. Symbols absent from the tree get
    /// length 0.
    pub fn from_tree(tree: &CodeTree, symbol_limit: usize) -> Result<Self> {
        if symbol_limit < 2 {
            return Err(HuffError::format("at least 2 symbols are needed"));
        }
        let mut code_lengths = vec![0_u32; symbol_limit];
        return_leaves(tree.root(), 0, &mut code_lengths)?;
        Ok(Self { code_lengths })
    }

    pub fn symbol_limit(&self) -> usize {
        self.code_lengths.len()
    }

    pub fn code_length(&self, symbol: u16) -> Result<u32> {
        self.code_lengths
            .get(symbol as usize)
            .copied()
            .ok_or_else(|| {
                HuffError::range(format!(
                    "symbol {} is outside the alphabet of {} symbols",
                    symbol,
                    self.code_lengths.len()
                ))
            })
    }

    pub fn code_lengths(&self) -> &[u32] {
        &self.code_lengths
    }

    pub fn max_code_length(&self) -> u32 {
        self.code_lengths.iter().copied().max().unwrap_or(0)
    }

    /// Build the canonical code tree, one level at a time from the deepest up. At each level the leaves
    /// of that length come first (in symbol order), followed by the internal nodes formed by pairing the
    /// level below. This puts shorter codes numerically before longer ones.
    pub fn to_code_tree(&self) -> Result<CodeTree> {
        let mut nodes: Vec<Node> = Vec::new();
        for len in (0..=self.max_code_length()).rev() {
            if nodes.len() % 2 != 0 {
                return Err(HuffError::format("code lengths do not form a complete tree"));
            }
            let mut new_nodes: Vec<Node> = Vec::with_capacity(nodes.len() / 2 + 1);

            // Add leaves for the symbols with this code length
            if len > 0 {
                new_nodes.extend(
                    self.code_lengths
                        .iter()
                        .enumerate()
                        .filter(|&(_, &l)| l == len)
                        .map(|(sym, _)| Node::Leaf(sym as u16)),
                );
            }

            // Merge pairs of nodes from the deeper level
            let mut deeper = nodes.into_iter();
            while let (Some(left), Some(right)) = (deeper.next(), deeper.next()) {
                new_nodes.push(Node::join(left, right));
            }
            nodes = new_nodes;
        }

        match (nodes.pop(), nodes.is_empty()) {
            (Some(root @ Node::Kids(..)), true) => CodeTree::new(root, self.code_lengths.len()),
            _ => Err(HuffError::format("code lengths do not form a single tree")),
        }
    }

    /// Returns the canonical (length, value) pair for each symbol, or None for unused symbols.
    /// Values are right aligned: the code is the low `length` bits, read most significant first.
    pub fn code_values(&self) -> Result<Vec<Option<(u32, u64)>>> {
        let max = self.max_code_length();
        if max > 64 {
            return Err(HuffError::format(format!(
                "code length {} does not fit a 64 bit code value",
                max
            )));
        }
        let mut order: Vec<(u32, usize)> = self
            .code_lengths
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l > 0)
            .map(|(sym, &l)| (l, sym))
            .collect();
        order.sort_unstable();

        let mut values = vec![None; self.code_lengths.len()];
        // (current length, next code at that length)
        let mut last_code: (u32, u64) = (order.first().map_or(0, |&(l, _)| l), 0);
        for (len, sym) in order {
            if len != last_code.0 {
                last_code.1 <<= len - last_code.0;
                last_code.0 = len;
            }
            values[sym] = Some((len, last_code.1));
            trace!("sym {:>3}: len {:>2} code {:0>width$b}", sym, len, last_code.1, width = len as usize);
            last_code.1 = last_code.1.wrapping_add(1);
        }
        Ok(values)
    }
}

/// Recursively walk the tree and record in code_lengths how deep each leaf is.
fn return_leaves(node: &Node, depth: u32, code_lengths: &mut [u32]) -> Result<()> {
    match node {
        Node::Kids(left, right) => {
            return_leaves(left, depth + 1, code_lengths)?;
            return_leaves(right, depth + 1, code_lengths)?;
        }
        Node::Leaf(sym) => {
            let limit = code_lengths.len();
            let slot = code_lengths.get_mut(*sym as usize).ok_or_else(|| {
                HuffError::range(format!("symbol {} exceeds the symbol limit {}", sym, limit))
            })?;
            *slot = depth;
        }
    }
    Ok(())
}
