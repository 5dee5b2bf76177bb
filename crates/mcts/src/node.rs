//! Search-tree node types.
//!
//! Nodes live in an arena (see [`crate::tree::Tree`]) and reference each
//! other by index, which keeps the parent back-reference non-owning while
//! the arena owns every node outright.

use std::fmt;

use arbor_core::GameState;

/// Index into the node arena.
///
/// A lightweight handle referencing a node in the tree. Using indices
/// instead of pointers avoids ownership cycles between parents and
/// children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// Statistics discipline of a node.
///
/// `Uct` nodes carry only the shared visit/reward sums. `Alpha` nodes add
/// the network-guided statistics: the evaluator's prior probability for the
/// inbound move, a running action-value estimate `q`, and a prior-weighted
/// exploration bonus `u` that decays as visits accumulate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Uct,
    Alpha { prior: f64, q: f64, u: f64 },
}

/// A node in the search tree.
///
/// Owns an independent snapshot of the game state, the move that produced
/// it, and the bookkeeping for incremental expansion: every legal move at
/// the snapshot is either still unexplored or materialized as exactly one
/// child, never both.
#[derive(Clone, Debug)]
pub struct Node<S: GameState> {
    pub(crate) state: S,
    pub(crate) mv: Option<S::Move>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) unexplored: Vec<S::Move>,
    pub(crate) visits: u32,
    pub(crate) reward: f64,
    pub(crate) terminal: bool,
    pub(crate) kind: NodeKind,
}

impl<S: GameState> Node<S> {
    fn new(state: S, mv: Option<S::Move>, parent: Option<NodeId>, kind: NodeKind) -> Self {
        let unexplored = state.legal_moves();
        let terminal = unexplored.is_empty();
        Self {
            state,
            mv,
            parent,
            children: Vec::new(),
            unexplored,
            visits: 0,
            reward: 0.0,
            terminal,
            kind,
        }
    }

    /// Create the root of a plain UCT tree from a state snapshot.
    pub fn root(state: S) -> Self {
        Self::new(state, None, None, NodeKind::Uct)
    }

    /// Create a UCT child for `mv`, which has already been applied to
    /// `state`.
    pub fn child(state: S, mv: S::Move, parent: NodeId) -> Self {
        Self::new(state, Some(mv), Some(parent), NodeKind::Uct)
    }

    /// Create the root of a network-guided tree. The root competes with
    /// nothing, so its prior is fixed at 1.0.
    pub fn alpha_root(state: S) -> Self {
        let kind = NodeKind::Alpha {
            prior: 1.0,
            q: 0.0,
            u: 1.0,
        };
        Self::new(state, None, None, kind)
    }

    /// Create a network-guided child for `mv` with the prior the evaluator
    /// assigned to it. The exploration bonus starts at the prior (its
    /// visit-zero form) and is recomputed on every update.
    pub fn alpha_child(state: S, mv: S::Move, parent: NodeId, prior: f64) -> Self {
        let kind = NodeKind::Alpha {
            prior,
            q: 0.0,
            u: prior,
        };
        Self::new(state, Some(mv), Some(parent), kind)
    }

    /// The game-state snapshot at this node.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The move that led here from the parent; `None` for the root.
    pub fn mv(&self) -> Option<S::Move> {
        self.mv
    }

    /// The parent's arena id; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Expanded children, in expansion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Legal moves not yet materialized as children.
    pub fn unexplored_moves(&self) -> &[S::Move] {
        &self.unexplored
    }

    /// Number of simulations recorded on this node.
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Running sum of backpropagated rewards.
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Statistics discipline of this node.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True once every legal move has a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.unexplored.is_empty()
    }

    /// True iff the snapshot had no legal moves.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Mean backpropagated reward.
    ///
    /// Returns 0.0 if the node has never been visited.
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }

    /// Selection score of this node from its parent's point of view:
    /// `q + u` for network-guided nodes, the plain mean reward otherwise.
    pub fn action_value(&self) -> f64 {
        match self.kind {
            NodeKind::Alpha { q, u, .. } => q + u,
            NodeKind::Uct => self.mean_reward(),
        }
    }
}

impl<S: GameState> fmt::Display for Node<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move={:?} visits={} reward={:.3} children={} unexplored={}",
            self.mv,
            self.visits,
            self.reward,
            self.children.len(),
            self.unexplored.len()
        )?;
        if let NodeKind::Alpha { prior, q, u } = self.kind {
            write!(f, " prior={:.3} q={:.3} u={:.3}", prior, q, u)?;
        }
        Ok(())
    }
}
