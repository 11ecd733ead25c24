//! An immutable binary code tree. Each leaf holds one symbol, and the path from the root to that leaf
//! (0 for the left child, 1 for the right child) is the symbol's code.

use crate::error::{HuffError, Result};

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Node {
    Kids(Box<Node>, Box<Node>),
    Leaf(u16),
}

impl Node {
    /// Join two subtrees under a new internal node.
    pub fn join(left: Node, right: Node) -> Node {
        Node::Kids(Box::new(left), Box::new(right))
    }
}

#[derive(Debug, Clone)]
pub struct CodeTree {
    root: Node,
    /// Code bits for each symbol, indexed by symbol. Empty for symbols not in the tree.
    codes: Vec<Vec<u8>>,
}

impl CodeTree {
    /// Build a code tree from a root node. The root must be an internal node, every leaf symbol must be
    /// below symbol_limit, and no symbol may appear twice.
    pub fn new(root: Node, symbol_limit: usize) -> Result<Self> {
        if let Node::Leaf(_) = root {
            return Err(HuffError::format("code tree root must be an internal node"));
        }
        let mut codes = vec![Vec::new(); symbol_limit];
        let mut prefix = Vec::new();
        build_code_list(&root, &mut prefix, &mut codes)?;
        Ok(Self { root, codes })
    }

    /// The root of the tree, for walking during decode.
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn symbol_limit(&self) -> usize {
        self.codes.len()
    }

    /// Returns the code bits for a symbol.
    pub fn code(&self, symbol: u16) -> Result<&[u8]> {
        match self.codes.get(symbol as usize) {
            None => Err(HuffError::range(format!(
                "symbol {} is outside the alphabet of {} symbols",
                symbol,
                self.codes.len()
            ))),
            Some(code) if code.is_empty() => Err(HuffError::range(format!(
                "no code is assigned to symbol {}",
                symbol
            ))),
            Some(code) => Ok(code),
        }
    }

    /// Returns true if the symbol has a code in this tree.
    pub fn contains(&self, symbol: u16) -> bool {
        self.codes
            .get(symbol as usize)
            .map_or(false, |code| !code.is_empty())
    }
}

/// Recursively walk the tree, recording the path to each leaf.
fn build_code_list(node: &Node, prefix: &mut Vec<u8>, codes: &mut [Vec<u8>]) -> Result<()> {
    match node {
        Node::Kids(left, right) => {
            prefix.push(0);
            build_code_list(left, prefix, codes)?;
            prefix.pop();
            prefix.push(1);
            build_code_list(right, prefix, codes)?;
            prefix.pop();
        }
        Node::Leaf(symbol) => {
            let limit = codes.len();
            let slot = codes.get_mut(*symbol as usize).ok_or_else(|| {
                HuffError::range(format!(
                    "symbol {} exceeds the symbol limit {}",
                    symbol, limit
                ))
            })?;
            if !slot.is_empty() {
                return Err(HuffError::format(format!(
                    "symbol {} has more than one code",
                    symbol
                )));
            }
            *slot = prefix.clone();
        }
    }
    Ok(())
}
