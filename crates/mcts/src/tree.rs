//! Arena-backed search tree.
//!
//! All nodes live in a flat `Vec` and reference each other through
//! [`NodeId`] indices. Using indices over `Rc<RefCell<Node>>` gives better
//! cache locality and keeps ownership simple: nodes are never removed, so
//! ids stay valid for the lifetime of the tree, and a fresh tree is built
//! for every search.

use arbor_core::GameState;

use crate::config::DEFAULT_C_PUCT;
use crate::node::{Node, NodeId, NodeKind};

/// The search tree for one run of the engine.
#[derive(Clone, Debug)]
pub struct Tree<S: GameState> {
    nodes: Vec<Node<S>>,
    c_puct: f64,
}

impl<S: GameState> Tree<S> {
    /// Create a tree holding only `root`, which becomes [`NodeId::ROOT`].
    pub fn with_root(root: Node<S>) -> Self {
        Self {
            nodes: vec![root],
            c_puct: DEFAULT_C_PUCT,
        }
    }

    /// Override the exploration constant used when recomputing the
    /// prior-weighted bonus of network-guided nodes.
    pub fn with_c_puct(mut self, c_puct: f64) -> Self {
        self.c_puct = c_puct;
        self
    }

    /// Get a reference to a node by id.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by id.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds no nodes. Never the case for a tree built
    /// through [`Tree::with_root`].
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S> {
        self.get(NodeId::ROOT)
    }

    /// Attach `child` under `parent`, consuming the matching entry in the
    /// parent's unexplored list.
    ///
    /// INVARIANT: every legal move at a node is either unexplored or
    /// expanded, never both. This is the only place a move flips from one
    /// side to the other.
    ///
    /// # Panics
    /// Panics if the child's parent link or move does not match the parent
    /// node. Both indicate a bug in the expanding policy.
    pub fn put_child(&mut self, parent: NodeId, child: Node<S>) -> NodeId {
        assert_eq!(
            child.parent,
            Some(parent),
            "BUG: child parent link mismatch"
        );
        let mv = match child.mv {
            Some(mv) => mv,
            None => panic!("BUG: child node without a move"),
        };

        let parent_node = self.get_mut(parent);
        let slot = match parent_node.unexplored.iter().position(|&m| m == mv) {
            Some(slot) => slot,
            None => panic!("BUG: move {:?} is not unexplored at its parent", mv),
        };
        parent_node.unexplored.remove(slot);

        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Record one simulation outcome on a single node.
    ///
    /// Visits and the reward sum grow unconditionally. Network-guided nodes
    /// additionally fold the reward into their running `q` and recompute the
    /// exploration bonus `u` from the parent's visit count, so the order in
    /// which a chain of updates runs matters (see [`Tree::backpropagate`]).
    pub(crate) fn update(&mut self, id: NodeId, reward: f64) {
        let parent_visits = self.get(id).parent.map(|p| self.get(p).visits);
        let c_puct = self.c_puct;

        let node = self.get_mut(id);
        node.visits += 1;
        node.reward += reward;
        if let NodeKind::Alpha { prior, q, u } = &mut node.kind {
            *q += (reward - *q) / node.visits as f64;
            if let Some(parent_visits) = parent_visits {
                *u = c_puct * *prior * (parent_visits as f64).sqrt() / (1.0 + node.visits as f64);
                *q += *u;
            }
        }
    }

    /// Propagate a simulation reward to every ancestor of `from`.
    ///
    /// The simulated node itself is left untouched; only its ancestors
    /// accumulate the reward, and all of them receive the same value. Plain
    /// UCT nodes are updated walking from the leaf toward the root.
    /// Network-guided nodes are updated root-first instead, so each
    /// recomputed bonus reads a parent visit count that already includes
    /// this simulation.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64) {
        match self.get(from).kind {
            NodeKind::Uct => {
                let mut current = self.get(from).parent;
                while let Some(id) = current {
                    current = self.get(id).parent;
                    self.update(id, reward);
                }
            }
            NodeKind::Alpha { .. } => {
                let mut chain = Vec::new();
                let mut current = self.get(from).parent;
                while let Some(id) = current {
                    chain.push(id);
                    current = self.get(id).parent;
                }
                while let Some(id) = chain.pop() {
                    self.update(id, reward);
                }
            }
        }
    }
}
