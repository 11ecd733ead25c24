//! Symbol frequency counts over the extended alphabet, and the greedy merge that turns them into an
//! optimal code tree.
//!
//! Only symbols that were counted become leaves. If fewer than two were counted, the lowest unused
//! symbols are added with weight 0, since a code tree needs at least two leaves.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use super::code_tree::{CodeTree, Node};
use crate::error::{HuffError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    frequencies: Vec<u32>,
}

impl FrequencyTable {
    /// Create a table from a vec of counts, one per symbol. At least two symbols are required.
    pub fn new(frequencies: Vec<u32>) -> Result<Self> {
        if frequencies.len() < 2 {
            return Err(HuffError::range("at least 2 symbols are needed"));
        }
        Ok(Self { frequencies })
    }

    pub fn symbol_limit(&self) -> usize {
        self.frequencies.len()
    }

    pub fn get(&self, symbol: u16) -> Result<u32> {
        self.check_symbol(symbol)?;
        Ok(self.frequencies[symbol as usize])
    }

    pub fn set(&mut self, symbol: u16, freq: u32) -> Result<()> {
        self.check_symbol(symbol)?;
        self.frequencies[symbol as usize] = freq;
        Ok(())
    }

    /// Add one to the count for symbol.
    pub fn increment(&mut self, symbol: u16) -> Result<()> {
        self.check_symbol(symbol)?;
        let freq = &mut self.frequencies[symbol as usize];
        *freq = freq
            .checked_add(1)
            .ok_or_else(|| HuffError::range(format!("count for symbol {} overflowed", symbol)))?;
        Ok(())
    }

    /// Number of symbols with a non-zero count.
    pub fn used_symbols(&self) -> usize {
        self.frequencies.iter().filter(|&&f| f > 0).count()
    }

    fn check_symbol(&self, symbol: u16) -> Result<()> {
        if (symbol as usize) < self.frequencies.len() {
            Ok(())
        } else {
            Err(HuffError::range(format!(
                "symbol {} is outside the alphabet of {} symbols",
                symbol,
                self.frequencies.len()
            )))
        }
    }

    /// Build an optimal code tree by repeatedly merging the two lightest nodes. Ties are broken by the
    /// lowest symbol contained in each node, so the same table always yields the same tree.
    pub fn build_code_tree(&self) -> Result<CodeTree> {
        let leaf = |sym: usize, freq: u32| Weighted {
            weight: freq as u64,
            lowest_symbol: sym as u16,
            node: Node::Leaf(sym as u16),
        };
        let mut heap: BinaryHeap<Weighted> = self
            .frequencies
            .iter()
            .enumerate()
            .filter(|&(_, &freq)| freq > 0)
            .map(|(sym, &freq)| leaf(sym, freq))
            .collect();

        // Pad with unused symbols until we have two leaves
        for (sym, &freq) in self.frequencies.iter().enumerate() {
            if heap.len() >= 2 {
                break;
            }
            if freq == 0 {
                heap.push(leaf(sym, freq));
            }
        }

        // Pare the heap down to one single node with child nodes
        while heap.len() > 1 {
            let (left, right) = match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => (left, right),
                _ => return Err(HuffError::format("code tree heap emptied early")),
            };
            heap.push(Weighted {
                weight: left.weight + right.weight,
                lowest_symbol: left.lowest_symbol.min(right.lowest_symbol),
                node: Node::join(left.node, right.node),
            });
        }
        let root = heap
            .pop()
            .ok_or_else(|| HuffError::format("no symbols to build a code tree from"))?;
        debug!(
            "Built code tree over {} symbols ({} used), total weight {}",
            self.frequencies.len(),
            self.used_symbols(),
            root.weight
        );
        CodeTree::new(root.node, self.frequencies.len())
    }
}

/// A subtree waiting to be merged, with its total weight.
#[derive(Debug)]
struct Weighted {
    weight: u64,
    lowest_symbol: u16,
    node: Node,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.lowest_symbol == other.lowest_symbol
    }
}

impl Eq for Weighted {}

impl Ord for Weighted {
    /// Reversed so the BinaryHeap pops the lightest node first, then the lowest symbol.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.lowest_symbol.cmp(&self.lowest_symbol))
    }
}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::FrequencyTable;
    use crate::alphabet::{EOF_SYMBOL, SYMBOL_LIMIT};
    use crate::error::HuffError;

    #[test]
    fn increment_test() {
        let mut freqs = FrequencyTable::new(vec![0; SYMBOL_LIMIT]).unwrap();
        freqs.increment(65).unwrap();
        freqs.increment(65).unwrap();
        freqs.increment(EOF_SYMBOL).unwrap();
        assert_eq!(freqs.get(65).unwrap(), 2);
        assert_eq!(freqs.get(EOF_SYMBOL).unwrap(), 1);
        assert_eq!(freqs.used_symbols(), 2);
    }

    #[test]
    fn range_test() {
        let mut freqs = FrequencyTable::new(vec![0; SYMBOL_LIMIT]).unwrap();
        assert!(matches!(freqs.increment(322), Err(HuffError::Range(_))));
        assert!(matches!(freqs.get(400), Err(HuffError::Range(_))));
        assert!(matches!(
            FrequencyTable::new(vec![1]),
            Err(HuffError::Range(_))
        ));
    }

    #[test]
    fn overflow_test() {
        let mut freqs = FrequencyTable::new(vec![0; 4]).unwrap();
        freqs.set(2, u32::MAX).unwrap();
        assert!(matches!(freqs.increment(2), Err(HuffError::Range(_))));
        assert_eq!(freqs.get(2).unwrap(), u32::MAX);
    }

    #[test]
    fn only_counted_symbols_in_tree_test() {
        let mut freqs = FrequencyTable::new(vec![0; SYMBOL_LIMIT]).unwrap();
        freqs.increment(EOF_SYMBOL).unwrap();
        "ABC".bytes().for_each(|b| freqs.increment(b as u16).unwrap());
        let tree = freqs.build_code_tree().unwrap();
        for sym in 0..SYMBOL_LIMIT as u16 {
            let counted = freqs.get(sym).unwrap() > 0;
            assert_eq!(tree.contains(sym), counted, "symbol {}", sym);
        }
    }

    #[test]
    fn padding_test() {
        // Only EOF counted: symbol 0 is added so the tree has two leaves
        let mut freqs = FrequencyTable::new(vec![0; SYMBOL_LIMIT]).unwrap();
        freqs.increment(EOF_SYMBOL).unwrap();
        let tree = freqs.build_code_tree().unwrap();
        assert_eq!(tree.code(0).unwrap().len(), 1);
        assert_eq!(tree.code(EOF_SYMBOL).unwrap().len(), 1);
        assert!(!tree.contains(1));

        // Nothing counted at all
        let tree = FrequencyTable::new(vec![0; 5]).unwrap().build_code_tree().unwrap();
        assert!(tree.contains(0));
        assert!(tree.contains(1));
        assert!(!tree.contains(2));
    }

    #[test]
    fn frequent_symbols_are_shorter_test() {
        let mut counts = vec![0; 8];
        counts[0] = 100;
        counts[1] = 50;
        counts[2] = 10;
        counts[3] = 1;
        counts[4] = 1;
        let tree = FrequencyTable::new(counts).unwrap().build_code_tree().unwrap();
        let len = |s| tree.code(s).unwrap().len();
        assert_eq!(len(0), 1);
        assert_eq!(len(1), 2);
        assert_eq!(len(2), 3);
        assert_eq!(len(3), 4);
        assert_eq!(len(4), 4);
        assert!(!tree.contains(7));
    }

    #[test]
    fn tie_break_test() {
        // Equal weights: the lowest symbols are merged first and sit deepest
        let tree = FrequencyTable::new(vec![1, 1, 1]).unwrap().build_code_tree().unwrap();
        assert_eq!(tree.code(2).unwrap(), &[0]);
        assert_eq!(tree.code(0).unwrap(), &[1, 0]);
        assert_eq!(tree.code(1).unwrap(), &[1, 1]);
    }

    #[test]
    fn deterministic_test() {
        let counts: Vec<u32> = (0..SYMBOL_LIMIT as u32).map(|i| (i * 7) % 5).collect();
        let table = FrequencyTable::new(counts).unwrap();
        let a = table.build_code_tree().unwrap();
        let b = table.build_code_tree().unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn two_symbol_test() {
        let tree = FrequencyTable::new(vec![0, 0]).unwrap().build_code_tree().unwrap();
        assert_eq!(tree.code(0).unwrap().len(), 1);
        assert_eq!(tree.code(1).unwrap().len(), 1);
    }
}
