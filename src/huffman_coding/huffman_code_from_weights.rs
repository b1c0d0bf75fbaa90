//! This helper builds huffman code lengths (depth tables) from symbol weights.
//!
//! Nodes are merged greedily, two lightest first. Equal weights are broken by the smallest
//! symbol value held in each node so the same weights always give the same tree. Code lengths
//! are limited to MAX_CODE_LEN bits. If the weights supplied create longer codes, the weights
//! are flattened and another attempt is made.
//!

use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::huffman::MAX_CODE_LEN;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u8),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub depth: u8,
    /// Smallest symbol value found under this node. Used to break weight ties.
    pub syms: u8,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, depth: u8, syms: u8, node_data: NodeData) -> Node {
        Node {
            weight,
            depth,
            syms,
            node_data,
        }
    }
}

impl Ord for Node {
    /// Reversed so a max-heap hands back the lightest node, then the smallest symbol.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.syms.cmp(&self.syms))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns a code length for each of the 256 byte values. Symbols with a zero weight get
/// length 0 (no code). A lone symbol gets a 1 bit code.
pub fn code_len_from_weights(sym_weight: &[u32]) -> Vec<u8> {
    let mut lengths = vec![0_u8; 256];

    let mut weight = sym_weight
        .iter()
        .enumerate()
        .take(256)
        .filter(|&(_, &f)| f > 0)
        .map(|(i, &f)| (f as u64, i as u8))
        .collect::<Vec<(u64, u8)>>();

    match weight.len() {
        0 => return lengths,
        1 => {
            lengths[weight[0].1 as usize] = 1;
            return lengths;
        }
        _ => {}
    }

    // We need to make codes of MAX_CODE_LEN bits or less. If we can't, we will adjust the
    // weights and try again.
    loop {
        let mut tree: BinaryHeap<Node> = weight
            .iter()
            .map(|&(f, s)| Node::new(f, 0, s, NodeData::Leaf(s)))
            .collect();

        // Pare it down to one single node with child nodes.
        let root = loop {
            match (tree.pop(), tree.pop()) {
                (Some(left_child), Some(right_child)) => tree.push(Node::new(
                    left_child.weight + right_child.weight,
                    left_child.depth.max(right_child.depth) + 1,
                    left_child.syms.min(right_child.syms),
                    NodeData::Kids(Box::new(left_child), Box::new(right_child)),
                )),
                (Some(root), None) => break root,
                _ => return lengths,
            }
        };

        if root.depth <= MAX_CODE_LEN {
            let mut leaves = vec![];
            return_leaves(&root, 0, &mut leaves);
            for (sym, len) in leaves {
                lengths[sym as usize] = len;
            }
            return lengths;
        }

        // Adjust weights by dividing each weight by 2 and adding 1.
        // This "flattens" the node tree. Then go try this again.
        debug!(
            "Huffman tree depth {} is over {}. Flattening weights.",
            root.depth, MAX_CODE_LEN
        );
        for item in weight.iter_mut() {
            item.0 = 1 + item.0 / 2;
        }
    }
}

/// Recursively walk the tree and return in "leaves" how far (deep) from the root node each leaf is.
/// Depth is the same as the code length, and will be used to create actual codes later.
fn return_leaves(node: &Node, depth: u8, leaves: &mut Vec<(u8, u8)>) {
    match &node.node_data {
        NodeData::Kids(left_child, right_child) => {
            return_leaves(left_child, depth + 1, leaves);
            return_leaves(right_child, depth + 1, leaves);
        }
        NodeData::Leaf(sym) => {
            leaves.push((*sym, depth));
        }
    };
}
