//! Huffman tree construction and code-length extraction.
//!
//! The tree lives in an index-addressed arena and is dropped as soon as the
//! per-symbol depths are known. Nothing downstream keeps a reference to it.

use super::Symbol;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Arena node. Children are indices into `CodeTree::nodes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Leaf(Symbol),
    Internal([usize; 2]),
}

/// A node waiting in the merge queue.
///
/// Weights are `u128` so merged `u64` weights cannot overflow.
#[derive(Debug, Clone, Copy)]
struct QueuedNode {
    weight: u128,
    seq: u64,
    node: usize,
}

// Min-heap on (weight, insertion order)
impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Collects weighted leaves and merges them into a [`CodeTree`].
///
/// The EOF leaf is pushed on construction with weight 0, so every tree has
/// at least one leaf and EOF always gets a code.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
    queue: BinaryHeap<QueuedNode>,
    next_seq: u64,
}

impl TreeBuilder {
    pub(crate) fn new(eof: Symbol) -> Self {
        let mut builder = Self {
            nodes: Vec::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        };
        builder.push(Node::Leaf(eof), 0);
        builder
    }

    pub(crate) fn add_leaf(&mut self, symbol: Symbol, weight: u64) {
        self.push(Node::Leaf(symbol), weight as u128);
    }

    fn push(&mut self, node: Node, weight: u128) {
        let index = self.nodes.len();
        self.nodes.push(node);
        self.queue.push(QueuedNode {
            weight,
            seq: self.next_seq,
            node: index,
        });
        self.next_seq += 1;
    }

    /// Merge the two lightest nodes until a single root remains.
    pub(crate) fn build(mut self) -> CodeTree {
        while self.queue.len() > 1 {
            let (Some(first), Some(second)) = (self.queue.pop(), self.queue.pop()) else {
                break;
            };
            self.push(
                Node::Internal([second.node, first.node]),
                first.weight + second.weight,
            );
        }

        // The EOF leaf at index 0 guarantees the queue is never empty here
        let root = self.queue.pop().map_or(0, |entry| entry.node);

        CodeTree {
            nodes: self.nodes,
            root,
        }
    }
}

/// Binary code tree produced by [`TreeBuilder`].
#[derive(Debug)]
pub(crate) struct CodeTree {
    nodes: Vec<Node>,
    root: usize,
}

impl CodeTree {
    /// Depth of every leaf, indexed by symbol id; 0 for symbols not in the tree.
    ///
    /// A tree made of a single leaf would give that leaf depth 0, which is
    /// not a writable codeword. It is assigned length 1 instead.
    pub(crate) fn code_lengths(&self, alphabet_len: usize) -> Vec<u32> {
        let mut lengths = vec![0u32; alphabet_len];
        let mut stack = vec![(self.root, 0u32)];

        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf(symbol) => {
                    if let Some(slot) = lengths.get_mut(symbol as usize) {
                        *slot = depth.max(1);
                    }
                }
                Node::Internal([left, right]) => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }

        lengths
    }

    #[cfg(test)]
    fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf(_)))
            .count()
    }
}

/// Build the Huffman tree for `weights` plus the trailing EOF symbol.
///
/// Symbols with weight 0 are left out. The EOF symbol is `weights.len()`.
pub(crate) fn build_tree(weights: &[u64]) -> CodeTree {
    let mut builder = TreeBuilder::new(weights.len() as Symbol);
    for (symbol, &weight) in weights.iter().enumerate() {
        if weight != 0 {
            builder.add_leaf(symbol as Symbol, weight);
        }
    }
    builder.build()
}

/// Code length of every symbol, EOF last.
pub(crate) fn code_lengths(weights: &[u64]) -> Vec<u32> {
    build_tree(weights).code_lengths(weights.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kraft_sum(lengths: &[u32]) -> f64 {
        lengths
            .iter()
            .filter(|&&len| len > 0)
            .map(|&len| 0.5f64.powi(len as i32))
            .sum()
    }

    #[test]
    fn test_reference_weights() {
        let lengths = code_lengths(&[3, 1, 4, 1, 5, 9]);
        assert_eq!(lengths, vec![3, 5, 2, 4, 2, 2, 5]);
        assert_eq!(kraft_sum(&lengths), 1.0);
    }

    #[test]
    fn test_eof_always_present() {
        let tree = build_tree(&[0, 7, 0]);
        assert_eq!(tree.leaf_count(), 2);

        let lengths = tree.code_lengths(4);
        assert_eq!(lengths, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_zero_weights_never_coded() {
        let lengths = code_lengths(&[0, 10, 0, 20, 0]);
        assert_eq!(lengths[0], 0);
        assert_eq!(lengths[2], 0);
        assert_eq!(lengths[4], 0);
        assert!(lengths[5] > 0);
        assert_eq!(kraft_sum(&lengths), 1.0);
    }

    #[test]
    fn test_single_leaf_gets_length_one() {
        assert_eq!(code_lengths(&[]), vec![1]);
        assert_eq!(code_lengths(&[0, 0, 0]), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_uniform_weights_balanced() {
        // 7 symbols + EOF fill a complete tree of depth 3
        let lengths = code_lengths(&[1; 7]);
        assert_eq!(lengths, vec![3; 8]);
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let lengths = code_lengths(&[u64::MAX, u64::MAX, u64::MAX]);
        assert_eq!(kraft_sum(&lengths), 1.0);
    }

    #[test]
    fn test_deterministic() {
        let weights = [5, 5, 5, 5, 1, 1, 2, 2];
        assert_eq!(code_lengths(&weights), code_lengths(&weights));
    }

    #[test]
    fn test_queue_orders_by_weight_then_seq() {
        let mut heap = BinaryHeap::new();
        heap.push(QueuedNode {
            weight: 2,
            seq: 0,
            node: 0,
        });
        heap.push(QueuedNode {
            weight: 1,
            seq: 2,
            node: 1,
        });
        heap.push(QueuedNode {
            weight: 1,
            seq: 1,
            node: 2,
        });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }
}
