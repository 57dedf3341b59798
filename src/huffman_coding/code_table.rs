//! Symbol to code lookup, built once per tree.
//!
//! Walking the tree for every encoded byte costs a full search each time. One recursive walk
//! after the tree is built records every leaf's path instead, and encoding becomes an index.
//!

use super::huffman::{HuffmanTree, Node, NodeData, EOF_SYMBOL};

/// Codes indexed by symbol. false is a left step, true a right step.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> CodeTable {
        let mut codes = vec![None; EOF_SYMBOL as usize + 1];
        let mut path = Vec::new();
        return_leaves(tree.root(), &mut path, &mut codes);
        CodeTable { codes }
    }

    /// Code for a symbol, or None if the tree has no leaf for it.
    pub fn get(&self, symbol: u16) -> Option<&[bool]> {
        self.codes.get(symbol as usize)?.as_deref()
    }

    /// Number of symbols that have a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recursively walk the tree and record the path to each leaf.
fn return_leaves(node: &Node, path: &mut Vec<bool>, codes: &mut [Option<Vec<bool>>]) {
    match &node.node_data {
        NodeData::Kids(left, right) => {
            path.push(false);
            return_leaves(left, path, codes);
            path.pop();
            path.push(true);
            return_leaves(right, path, codes);
            path.pop();
        }
        NodeData::Leaf(symbol) => {
            if let Some(slot) = codes.get_mut(*symbol as usize) {
                *slot = Some(path.clone());
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::CodeTable;
    use crate::huffman_coding::huffman::{HuffmanTree, EOF_SYMBOL};
    use crate::tools::freq_count::create_frequency_map;

    #[test]
    fn matches_path_search() {
        let freqs = create_frequency_map(&b"the quick brown fox jumps over the lazy dog"[..]).unwrap();
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), tree.leaf_count());
        for sym in 0..=EOF_SYMBOL {
            assert_eq!(table.get(sym).map(|code| code.to_vec()), tree.find_path(sym));
        }
    }

    #[test]
    fn out_of_range_symbol() {
        let tree = HuffmanTree::from_frequencies(&Default::default()).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.get(EOF_SYMBOL), Some(&[][..]));
        assert_eq!(table.get(511), None);
        assert_eq!(table.get(0), None);
        assert!(!table.is_empty());
    }
}
