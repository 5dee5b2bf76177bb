//! Child-selection strategies.
//!
//! The tree policy and the final move choice both reduce to "pick the child
//! maximizing some score". This module provides the scores (UCT and its
//! pessimistic twin, the lower confidence interval) and one selector per
//! criterion. All selectors share the same edge-case contract: a node
//! without children is an error, and a node with exactly one child returns
//! it without scoring anything.

use std::f64::consts::FRAC_1_SQRT_2;

use arbor_core::GameState;

use crate::error::{Result, SearchError};
use crate::node::NodeId;
use crate::tree::Tree;

/// Default UCT exploration constant, 1/sqrt(2).
pub const DEFAULT_EXPLORATION: f64 = FRAC_1_SQRT_2;

/// UCT score of `child` as seen from `parent`.
///
/// `mean + exploration * sqrt(2 * ln(parent visits) / child visits)`.
/// An unvisited child scores positive infinity so it is always tried
/// before any visited sibling is revisited.
pub fn uct_reward<S: GameState>(
    tree: &Tree<S>,
    parent: NodeId,
    child: NodeId,
    exploration: f64,
) -> f64 {
    let child_node = tree.get(child);
    if child_node.visits() == 0 {
        return f64::INFINITY;
    }
    let parent_visits = tree.get(parent).visits() as f64;
    let bonus = (2.0 * parent_visits.ln() / child_node.visits() as f64).sqrt();
    child_node.mean_reward() + exploration * bonus
}

/// Lower confidence interval of `child`: the UCT mean minus its bonus.
///
/// An unvisited child scores negative infinity, making this the
/// pessimistic counterpart of [`uct_reward`] for final move selection.
pub fn lower_confidence_interval<S: GameState>(
    tree: &Tree<S>,
    parent: NodeId,
    child: NodeId,
    exploration: f64,
) -> f64 {
    let child_node = tree.get(child);
    if child_node.visits() == 0 {
        return f64::NEG_INFINITY;
    }
    let parent_visits = tree.get(parent).visits() as f64;
    let bonus = (2.0 * parent_visits.ln() / child_node.visits() as f64).sqrt();
    child_node.mean_reward() - exploration * bonus
}

/// Pick the child of `node` maximizing `score`. Ties go to the child
/// expanded first.
fn select_by<S, F>(tree: &Tree<S>, node: NodeId, score: F) -> Result<NodeId>
where
    S: GameState,
    F: Fn(NodeId) -> f64,
{
    let children = tree.get(node).children();
    match children {
        [] => Err(SearchError::NoChildren),
        // A lone child wins by default. Skipping the scoring also avoids
        // degenerate math on fresh nodes, e.g. ln(0) from an unvisited
        // parent.
        [only] => Ok(*only),
        _ => {
            let mut best = children[0];
            let mut best_score = score(best);
            for &child in &children[1..] {
                let child_score = score(child);
                if child_score > best_score {
                    best = child;
                    best_score = child_score;
                }
            }
            Ok(best)
        }
    }
}

/// Select the child with the highest UCT score. This drives descent through
/// fully expanded interior nodes.
pub fn select_best_child<S: GameState>(
    tree: &Tree<S>,
    node: NodeId,
    exploration: f64,
) -> Result<NodeId> {
    select_by(tree, node, |child| {
        uct_reward(tree, node, child, exploration)
    })
}

/// Select the child with the highest lower confidence interval.
pub fn select_secure_child<S: GameState>(
    tree: &Tree<S>,
    node: NodeId,
    exploration: f64,
) -> Result<NodeId> {
    select_by(tree, node, |child| {
        lower_confidence_interval(tree, node, child, exploration)
    })
}

/// Select the child with the highest mean reward.
pub fn select_max_child<S: GameState>(tree: &Tree<S>, node: NodeId) -> Result<NodeId> {
    select_by(tree, node, |child| tree.get(child).mean_reward())
}

/// Select the most-visited child. This is the criterion the search uses
/// for its final answer: visit counts are the most stable statistic a
/// budget-bound search produces.
pub fn select_robust_child<S: GameState>(tree: &Tree<S>, node: NodeId) -> Result<NodeId> {
    select_by(tree, node, |child| tree.get(child).visits() as f64)
}

/// Select the child with the highest action value, `q + u` for
/// network-guided nodes. This drives descent in network-guided trees.
pub fn select_action_value_child<S: GameState>(tree: &Tree<S>, node: NodeId) -> Result<NodeId> {
    select_by(tree, node, |child| tree.get(child).action_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    // One ply of `moves` choices, then the game is over.
    #[derive(Clone, Debug, PartialEq)]
    struct Branch {
        moves: u8,
        over: bool,
    }

    impl Branch {
        fn new(moves: u8) -> Self {
            Self { moves, over: false }
        }
    }

    impl GameState for Branch {
        type Move = u8;
        type Player = u8;

        fn side_to_move(&self) -> u8 {
            0
        }

        fn legal_moves(&self) -> Vec<u8> {
            if self.over {
                Vec::new()
            } else {
                (0..self.moves).collect()
            }
        }

        fn perform_move(&mut self, mv: u8) -> arbor_core::Result<()> {
            if self.over || mv >= self.moves {
                return Err(arbor_core::GameError::IllegalMove(format!("{}", mv)));
            }
            self.over = true;
            Ok(())
        }

        fn end_game_reward(&self, _side: u8) -> arbor_core::Result<f64> {
            if self.over {
                Ok(0.0)
            } else {
                Err(arbor_core::GameError::NotTerminal)
            }
        }
    }

    fn tree_with_children(moves: u8) -> Tree<Branch> {
        let mut tree = Tree::with_root(Node::root(Branch::new(moves)));
        for mv in 0..moves {
            let mut state = Branch::new(moves);
            state.perform_move(mv).unwrap();
            tree.put_child(NodeId::ROOT, Node::child(state, mv, NodeId::ROOT));
        }
        tree
    }

    fn set_stats(tree: &mut Tree<Branch>, id: NodeId, visits: u32, reward: f64) {
        let node = tree.get_mut(id);
        node.visits = visits;
        node.reward = reward;
    }

    #[test]
    fn test_selectors_fail_without_children() {
        let mut over = Branch::new(2);
        over.perform_move(0).unwrap();
        let tree = Tree::with_root(Node::root(over));

        assert!(matches!(
            select_best_child(&tree, NodeId::ROOT, DEFAULT_EXPLORATION),
            Err(SearchError::NoChildren)
        ));
        assert!(matches!(
            select_secure_child(&tree, NodeId::ROOT, DEFAULT_EXPLORATION),
            Err(SearchError::NoChildren)
        ));
        assert!(matches!(
            select_max_child(&tree, NodeId::ROOT),
            Err(SearchError::NoChildren)
        ));
        assert!(matches!(
            select_robust_child(&tree, NodeId::ROOT),
            Err(SearchError::NoChildren)
        ));
        assert!(matches!(
            select_action_value_child(&tree, NodeId::ROOT),
            Err(SearchError::NoChildren)
        ));
    }

    #[test]
    fn test_single_child_is_returned_without_scoring() {
        // Nothing has been visited yet, so the lone child must come back
        // without any statistics being consulted.
        let tree = tree_with_children(1);
        let only = tree.root().children()[0];

        assert_eq!(
            select_best_child(&tree, NodeId::ROOT, DEFAULT_EXPLORATION).unwrap(),
            only
        );
        assert_eq!(
            select_secure_child(&tree, NodeId::ROOT, DEFAULT_EXPLORATION).unwrap(),
            only
        );
        assert_eq!(select_max_child(&tree, NodeId::ROOT).unwrap(), only);
        assert_eq!(select_robust_child(&tree, NodeId::ROOT).unwrap(), only);
        assert_eq!(select_action_value_child(&tree, NodeId::ROOT).unwrap(), only);
    }

    #[test]
    fn test_best_child_tries_unvisited_first() {
        let mut tree = tree_with_children(2);
        let children: Vec<NodeId> = tree.root().children().to_vec();
        set_stats(&mut tree, NodeId::ROOT, 10, 0.0);
        set_stats(&mut tree, children[0], 10, 9.0);

        let picked = select_best_child(&tree, NodeId::ROOT, DEFAULT_EXPLORATION).unwrap();
        assert_eq!(picked, children[1]);
        assert_eq!(
            uct_reward(&tree, NodeId::ROOT, children[1], DEFAULT_EXPLORATION),
            f64::INFINITY
        );
    }

    #[test]
    fn test_secure_child_avoids_unvisited() {
        let mut tree = tree_with_children(2);
        let children: Vec<NodeId> = tree.root().children().to_vec();
        set_stats(&mut tree, NodeId::ROOT, 10, 0.0);
        set_stats(&mut tree, children[0], 10, 2.0);

        let picked = select_secure_child(&tree, NodeId::ROOT, DEFAULT_EXPLORATION).unwrap();
        assert_eq!(picked, children[0]);
        assert_eq!(
            lower_confidence_interval(&tree, NodeId::ROOT, children[1], DEFAULT_EXPLORATION),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_exploration_constant_shifts_the_choice() {
        let mut tree = tree_with_children(2);
        let children: Vec<NodeId> = tree.root().children().to_vec();
        set_stats(&mut tree, NodeId::ROOT, 92, 0.0);
        set_stats(&mut tree, children[0], 90, 81.0); // mean 0.9, well explored
        set_stats(&mut tree, children[1], 2, 1.0); // mean 0.5, barely visited

        // Pure exploitation sticks with the proven child; a large
        // exploration constant flips to the uncertain one.
        assert_eq!(
            select_best_child(&tree, NodeId::ROOT, 0.0).unwrap(),
            children[0]
        );
        assert_eq!(
            select_best_child(&tree, NodeId::ROOT, 10.0).unwrap(),
            children[1]
        );
    }

    #[test]
    fn test_uct_matches_the_formula() {
        let mut tree = tree_with_children(2);
        let children: Vec<NodeId> = tree.root().children().to_vec();
        set_stats(&mut tree, NodeId::ROOT, 10, 0.0);
        set_stats(&mut tree, children[0], 5, 3.0);

        let bonus = (2.0 * 10f64.ln() / 5.0).sqrt();
        let uct = uct_reward(&tree, NodeId::ROOT, children[0], DEFAULT_EXPLORATION);
        let lci =
            lower_confidence_interval(&tree, NodeId::ROOT, children[0], DEFAULT_EXPLORATION);

        assert!((uct - (0.6 + DEFAULT_EXPLORATION * bonus)).abs() < 1e-9);
        assert!((lci - (0.6 - DEFAULT_EXPLORATION * bonus)).abs() < 1e-9);
        assert!(lci < 0.6 && 0.6 < uct);
    }

    #[test]
    fn test_max_and_robust_use_different_criteria() {
        let mut tree = tree_with_children(2);
        let children: Vec<NodeId> = tree.root().children().to_vec();
        set_stats(&mut tree, NodeId::ROOT, 30, 0.0);
        set_stats(&mut tree, children[0], 20, 10.0); // mean 0.5, most visits
        set_stats(&mut tree, children[1], 10, 9.0); // mean 0.9, fewer visits

        assert_eq!(select_max_child(&tree, NodeId::ROOT).unwrap(), children[1]);
        assert_eq!(
            select_robust_child(&tree, NodeId::ROOT).unwrap(),
            children[0]
        );
    }

    #[test]
    fn test_ties_go_to_the_first_child() {
        let mut tree = tree_with_children(3);
        let children: Vec<NodeId> = tree.root().children().to_vec();
        set_stats(&mut tree, NodeId::ROOT, 30, 0.0);
        for &child in &children {
            set_stats(&mut tree, child, 10, 5.0);
        }

        let first_pick = select_robust_child(&tree, NodeId::ROOT).unwrap();
        let second_pick = select_robust_child(&tree, NodeId::ROOT).unwrap();
        assert_eq!(first_pick, children[0]);
        assert_eq!(second_pick, first_pick);
        assert_eq!(select_max_child(&tree, NodeId::ROOT).unwrap(), children[0]);
    }
}
