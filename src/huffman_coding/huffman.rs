use log::{debug, trace};

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::io::{Read, Write};

use super::code_table::CodeTable;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{GrinError, Result};
use crate::tools::freq_count::FrequencyTable;

/// Reserved symbol marking the end of the encoded payload. Never written as output data.
pub const EOF_SYMBOL: u16 = 256;
/// Width of a serialized symbol: 256 byte values plus EOF need 9 bits.
pub const SYMBOL_BITS: usize = 9;
/// Deepest possible tree over 257 leaves. Anything deeper in a serialized tree is corrupt.
const MAX_DEPTH: usize = EOF_SYMBOL as usize;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u16),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    /// Occurrence count. Only meaningful during construction; 0 after deserialization.
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    pub fn leaf(symbol: u16, weight: u64) -> Node {
        Node {
            weight,
            node_data: NodeData::Leaf(symbol),
        }
    }

    /// Join two subtrees. The parent weight is the sum of the kids.
    pub fn join(left: Node, right: Node) -> Result<Node> {
        let weight = left
            .weight
            .checked_add(right.weight)
            .ok_or(GrinError::WeightOverflow)?;
        Ok(Node {
            weight,
            node_data: NodeData::Kids(Box::new(left), Box::new(right)),
        })
    }
}

/// Heap entry used while building the tree. Ordered by weight, then by the order the entry
/// was queued, so equal weights leave the queue first-in first-out.
#[derive(Debug)]
struct Pending {
    weight: u64,
    seq: u32,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.seq).cmp(&(other.weight, other.seq))
    }
}

/// Step of the decoder. Traversing holds the node reached so far.
#[derive(Clone, Copy)]
enum DecodeState<'a> {
    Traversing(&'a Node),
    Done,
}

/// A Huffman code over 9 bit symbols. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
    eof: u16,
}

impl HuffmanTree {
    /// Build a tree from a frequency table of byte values. The EOF symbol is added with a
    /// weight of 1 when the table does not already contain it.
    ///
    /// Ties are broken deterministically: leaves are queued in ascending symbol order and
    /// every merged node is queued after everything already present, so nodes of equal
    /// weight come out in the order they went in. The first node out becomes the left kid.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<HuffmanTree> {
        let mut leaves: Vec<(u16, u64)> = freqs.iter().map(|(&sym, &weight)| (sym, weight)).collect();
        if let Some(&(sym, _)) = leaves.iter().find(|(sym, _)| *sym > EOF_SYMBOL) {
            return Err(GrinError::InvalidSymbol(sym));
        }
        if !freqs.contains_key(&EOF_SYMBOL) {
            leaves.push((EOF_SYMBOL, 1));
        }
        leaves.sort_unstable_by_key(|&(sym, _)| sym);

        let mut seq = 0_u32;
        let mut heap: BinaryHeap<Reverse<Pending>> = BinaryHeap::with_capacity(leaves.len());
        for (sym, weight) in leaves {
            heap.push(Reverse(Pending {
                weight,
                seq,
                node: Node::leaf(sym, weight),
            }));
            seq += 1;
        }

        // Pull off the two lightest nodes and queue their parent until one node is left.
        loop {
            let Reverse(first) = heap.pop().ok_or(GrinError::MalformedTree("empty tree"))?;
            let Reverse(second) = match heap.pop() {
                Some(second) => second,
                None => {
                    let tree = HuffmanTree {
                        root: first.node,
                        eof: EOF_SYMBOL,
                    };
                    debug!(
                        "Built tree with {} leaves, depth {}, total weight {}",
                        tree.leaf_count(),
                        tree.depth(),
                        tree.root.weight
                    );
                    return Ok(tree);
                }
            };
            let node = Node::join(first.node, second.node)?;
            heap.push(Reverse(Pending {
                weight: node.weight,
                seq,
                node,
            }));
            seq += 1;
        }
    }

    /// Rebuild a tree from its serialized form. The reader must be positioned on the first
    /// bit of the tree, i.e. just past the file header.
    pub fn deserialize<R: Read>(br: &mut BitReader<R>) -> Result<HuffmanTree> {
        let mut seen = [false; EOF_SYMBOL as usize + 1];
        let root = read_node(br, 0, &mut seen)?;
        let tree = HuffmanTree {
            root,
            eof: EOF_SYMBOL,
        };
        debug!(
            "Read tree with {} leaves, depth {}. Stream at {}",
            tree.leaf_count(),
            tree.depth(),
            br.loc()
        );
        Ok(tree)
    }

    /// Write the tree in preorder: a leaf is a 0 bit and the 9 bit symbol, an internal node is
    /// a 1 bit followed by the left subtree and then the right subtree.
    pub fn serialize<W: Write>(&self, bw: &mut BitWriter<W>) -> Result<()> {
        write_node(&self.root, bw)
    }

    /// Return the root-to-leaf path for a symbol (false = left, true = right), or None if
    /// the tree has no leaf for it. Searches left before right.
    pub fn find_path(&self, symbol: u16) -> Option<Vec<bool>> {
        let mut path = Vec::new();
        if find(&self.root, symbol, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Encode a byte stream, 8 bits at a time, and terminate it with the EOF code.
    pub fn encode<R: Read, W: Write>(&self, br: &mut BitReader<R>, bw: &mut BitWriter<W>) -> Result<()> {
        let table = CodeTable::from_tree(self);
        let mut symbols = 0_u64;
        while let Some(bits) = br.bint(8)? {
            let symbol = bits as u16;
            let code = table.get(symbol).ok_or(GrinError::SymbolNotFound(symbol))?;
            for &bit in code {
                bw.out_bit(bit)?;
            }
            symbols += 1;
        }
        let code = table.get(self.eof).ok_or(GrinError::SymbolNotFound(self.eof))?;
        for &bit in code {
            bw.out_bit(bit)?;
        }
        debug!("Encoded {} symbols into {} bits", symbols, bw.bits_written());
        Ok(())
    }

    /// Decode codes from the reader until the EOF code, writing each symbol as a byte.
    /// Running out of bits first is reported as a truncated payload.
    pub fn decode<R: Read, W: Write>(&self, br: &mut BitReader<R>, bw: &mut BitWriter<W>) -> Result<()> {
        // A lone leaf has no code bits. EOF alone is an empty payload; any other lone
        // symbol could never terminate.
        if let NodeData::Leaf(symbol) = self.root.node_data {
            if symbol == self.eof {
                return Ok(());
            }
            return Err(GrinError::MalformedTree("single leaf is not the end-of-stream symbol"));
        }

        let mut state = DecodeState::Traversing(&self.root);
        let mut symbols = 0_u64;
        while let DecodeState::Traversing(current) = state {
            let bit = br.bit()?.ok_or(GrinError::TruncatedPayload)?;
            let next = match &current.node_data {
                NodeData::Kids(left, right) => {
                    if bit == 0 {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    }
                }
                // Leaves always hand control back to the root below
                NodeData::Leaf(_) => unreachable!("decoder resting on a leaf"),
            };
            state = match next.node_data {
                NodeData::Leaf(symbol) if symbol == self.eof => DecodeState::Done,
                NodeData::Leaf(symbol) => {
                    bw.out8(symbol as u8)?;
                    symbols += 1;
                    DecodeState::Traversing(&self.root)
                }
                NodeData::Kids(..) => DecodeState::Traversing(next),
            };
        }
        debug!("Decoded {} symbols", symbols);
        Ok(())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.root)
    }

    /// Length of the longest code.
    pub fn depth(&self) -> usize {
        node_depth(&self.root)
    }
}

fn read_node<R: Read>(br: &mut BitReader<R>, depth: usize, seen: &mut [bool]) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(GrinError::MalformedTree("tree is deeper than any valid tree"));
    }
    match br.bit()? {
        None => Err(GrinError::MalformedTree("stream ended inside the tree")),
        Some(0) => {
            let symbol = br
                .bint(SYMBOL_BITS)?
                .ok_or(GrinError::MalformedTree("stream ended inside a leaf"))? as u16;
            if symbol > EOF_SYMBOL {
                return Err(GrinError::MalformedTree("leaf symbol out of range"));
            }
            if seen[symbol as usize] {
                return Err(GrinError::MalformedTree("symbol appears at two leaves"));
            }
            seen[symbol as usize] = true;
            trace!("Leaf {} at depth {}", symbol, depth);
            Ok(Node::leaf(symbol, 0))
        }
        Some(_) => {
            let left = read_node(br, depth + 1, seen)?;
            let right = read_node(br, depth + 1, seen)?;
            Node::join(left, right)
        }
    }
}

fn write_node<W: Write>(node: &Node, bw: &mut BitWriter<W>) -> Result<()> {
    match &node.node_data {
        NodeData::Leaf(symbol) => {
            bw.out_bit(false)?;
            bw.out_bits(*symbol as u32, SYMBOL_BITS as u8)?;
        }
        NodeData::Kids(left, right) => {
            bw.out_bit(true)?;
            write_node(left, bw)?;
            write_node(right, bw)?;
        }
    }
    Ok(())
}

fn find(node: &Node, symbol: u16, path: &mut Vec<bool>) -> bool {
    match &node.node_data {
        NodeData::Leaf(sym) => *sym == symbol,
        NodeData::Kids(left, right) => {
            path.push(false);
            if find(left, symbol, path) {
                return true;
            }
            path.pop();
            path.push(true);
            if find(right, symbol, path) {
                return true;
            }
            path.pop();
            false
        }
    }
}

fn count_leaves(node: &Node) -> usize {
    match &node.node_data {
        NodeData::Leaf(_) => 1,
        NodeData::Kids(left, right) => count_leaves(left) + count_leaves(right),
    }
}

fn node_depth(node: &Node) -> usize {
    match &node.node_data {
        NodeData::Leaf(_) => 0,
        NodeData::Kids(left, right) => 1 + node_depth(left).max(node_depth(right)),
    }
}
