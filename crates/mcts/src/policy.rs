//! Tree policies: descent and expansion.
//!
//! A tree policy owns the first phase of every simulation. Starting from
//! the root it walks through fully expanded nodes, and the first node it
//! reaches that still has unexplored moves gets one new child attached.
//! The node it settles on (new child, or a terminal node) is handed to the
//! default policy for simulation.

use arbor_core::GameState;

use crate::error::Result;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::{Node, NodeId};
use crate::select::{select_action_value_child, select_best_child, DEFAULT_EXPLORATION};
use crate::tree::Tree;

/// Strategy for the selection/expansion phase of a simulation.
pub trait TreePolicy<S: GameState> {
    /// Build the root node for a fresh tree over `state`. This pins the
    /// node kind (plain or network-guided) for the whole tree.
    fn root_node(&self, state: S) -> Node<S>;

    /// Walk down from `root` and return the node to simulate from,
    /// expanding one child along the way if the walk stops at a node with
    /// unexplored moves.
    fn select(&self, tree: &mut Tree<S>, root: NodeId) -> Result<NodeId>;
}

/// Classic UCT: descend by upper confidence bound, expand unexplored moves
/// in the order the game lists them.
#[derive(Clone, Copy, Debug)]
pub struct UctTreePolicy {
    exploration: f64,
}

impl UctTreePolicy {
    /// UCT policy with the default exploration constant.
    pub fn new() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
        }
    }

    /// UCT policy with a custom exploration constant.
    pub fn with_exploration(exploration: f64) -> Self {
        Self { exploration }
    }
}

impl Default for UctTreePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> TreePolicy<S> for UctTreePolicy {
    fn root_node(&self, state: S) -> Node<S> {
        Node::root(state)
    }

    fn select(&self, tree: &mut Tree<S>, root: NodeId) -> Result<NodeId> {
        let mut current = root;
        loop {
            let node = tree.get(current);
            if node.is_terminal() {
                return Ok(current);
            }
            if !node.is_fully_expanded() {
                return expand_uct(tree, current);
            }
            current = select_best_child(tree, current, self.exploration)?;
        }
    }
}

/// Attach a plain child for the first unexplored move of `parent`.
fn expand_uct<S: GameState>(tree: &mut Tree<S>, parent: NodeId) -> Result<NodeId> {
    let child = {
        let parent_node = tree.get(parent);
        let mv = parent_node.unexplored_moves()[0];
        let mut state = parent_node.state().clone();
        state.perform_move(mv)?;
        Node::child(state, mv, parent)
    };
    Ok(tree.put_child(parent, child))
}

/// Network-guided policy: descend by action value (`q + u`), expand with
/// the prior the evaluator assigns to each move.
#[derive(Clone, Debug)]
pub struct AlphaTreePolicy<E> {
    evaluator: E,
}

impl<E> AlphaTreePolicy<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    /// Attach a network-guided child for the first unexplored move of
    /// `parent`, with the prior taken from a fresh evaluation of the
    /// parent position.
    fn expand<S>(&self, tree: &mut Tree<S>, parent: NodeId) -> Result<NodeId>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        let child = {
            let parent_node = tree.get(parent);
            let mv = parent_node.unexplored_moves()[0];
            let legal = parent_node.state().legal_moves();
            let eval = self.evaluator.evaluate(parent_node.state(), &legal)?;
            let prior = eval.prior(mv).ok_or_else(|| {
                EvaluatorError::Malformed(format!("no prior for legal move {:?}", mv))
            })?;
            let mut state = parent_node.state().clone();
            state.perform_move(mv)?;
            Node::alpha_child(state, mv, parent, prior)
        };
        Ok(tree.put_child(parent, child))
    }
}

impl<S: GameState, E: Evaluator<S>> TreePolicy<S> for AlphaTreePolicy<E> {
    fn root_node(&self, state: S) -> Node<S> {
        Node::alpha_root(state)
    }

    fn select(&self, tree: &mut Tree<S>, root: NodeId) -> Result<NodeId> {
        let mut current = root;
        loop {
            let node = tree.get(current);
            if node.is_terminal() {
                return Ok(current);
            }
            if !node.is_fully_expanded() {
                return self.expand(tree, current);
            }
            current = select_action_value_child(tree, current)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::evaluator::Evaluation;
    use crate::node::NodeKind;

    // Fixed-depth game: `branching` moves per position for `plies` plies.
    #[derive(Clone, Debug, PartialEq)]
    struct Countdown {
        plies: u8,
        branching: u8,
    }

    impl GameState for Countdown {
        type Move = u8;
        type Player = u8;

        fn side_to_move(&self) -> u8 {
            self.plies % 2
        }

        fn legal_moves(&self) -> Vec<u8> {
            if self.plies == 0 {
                Vec::new()
            } else {
                (0..self.branching).collect()
            }
        }

        fn perform_move(&mut self, mv: u8) -> arbor_core::Result<()> {
            if self.plies == 0 || mv >= self.branching {
                return Err(arbor_core::GameError::IllegalMove(format!("{}", mv)));
            }
            self.plies -= 1;
            Ok(())
        }

        fn end_game_reward(&self, _side: u8) -> arbor_core::Result<f64> {
            if self.plies == 0 {
                Ok(1.0)
            } else {
                Err(arbor_core::GameError::NotTerminal)
            }
        }
    }

    fn fresh_tree<P: TreePolicy<Countdown>>(policy: &P, plies: u8, branching: u8) -> Tree<Countdown> {
        Tree::with_root(policy.root_node(Countdown { plies, branching }))
    }

    #[test]
    fn test_first_pass_expands_a_root_child() {
        let policy = UctTreePolicy::new();
        let mut tree = fresh_tree(&policy, 2, 3);

        let node = policy.select(&mut tree, NodeId::ROOT).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(node).parent(), Some(NodeId::ROOT));
        assert_eq!(tree.get(node).mv(), Some(0));
        assert_eq!(tree.root().unexplored_moves(), &[1, 2]);
        assert_eq!(tree.root().children(), &[node]);
    }

    #[test]
    fn test_single_move_position_is_fully_expanded_after_one_pass() {
        let policy = UctTreePolicy::new();
        let mut tree = fresh_tree(&policy, 2, 1);

        let node = policy.select(&mut tree, NodeId::ROOT).unwrap();

        assert_eq!(tree.root().children(), &[node]);
        assert!(tree.root().unexplored_moves().is_empty());
        assert!(tree.root().is_fully_expanded());
    }

    #[test]
    fn test_expansion_follows_the_legal_move_order() {
        let policy = UctTreePolicy::new();
        let mut tree = fresh_tree(&policy, 2, 3);

        let first = policy.select(&mut tree, NodeId::ROOT).unwrap();
        let second = policy.select(&mut tree, NodeId::ROOT).unwrap();

        assert_eq!(tree.get(first).mv(), Some(0));
        assert_eq!(tree.get(second).mv(), Some(1));
        assert_eq!(tree.root().unexplored_moves(), &[2]);
    }

    #[test]
    fn test_descends_once_the_root_is_fully_expanded() {
        let policy = UctTreePolicy::new();
        let mut tree = fresh_tree(&policy, 2, 2);

        policy.select(&mut tree, NodeId::ROOT).unwrap();
        policy.select(&mut tree, NodeId::ROOT).unwrap();
        let grandchild = policy.select(&mut tree, NodeId::ROOT).unwrap();

        // Both root children score infinity (unvisited), so the walk takes
        // the first and expands below it.
        let first_child = tree.root().children()[0];
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get(grandchild).parent(), Some(first_child));
    }

    #[test]
    fn test_terminal_root_is_returned_untouched() {
        let policy = UctTreePolicy::new();
        let mut tree = fresh_tree(&policy, 0, 2);

        let node = policy.select(&mut tree, NodeId::ROOT).unwrap();

        assert_eq!(node, NodeId::ROOT);
        assert_eq!(tree.len(), 1);
    }

    #[derive(Clone, Debug)]
    struct FixedEval {
        priors: Vec<(u8, f64)>,
    }

    impl Evaluator<Countdown> for FixedEval {
        fn evaluate(
            &self,
            _state: &Countdown,
            legal_moves: &[u8],
        ) -> std::result::Result<Evaluation<u8>, EvaluatorError> {
            Ok(Evaluation {
                priors: self.priors.clone(),
                best_move: legal_moves[0],
                value: 0.0,
            })
        }
    }

    #[test]
    fn test_alpha_expansion_takes_priors_from_the_evaluator() {
        let policy = AlphaTreePolicy::new(FixedEval {
            priors: vec![(0, 0.7), (1, 0.3)],
        });
        let mut tree = fresh_tree(&policy, 2, 2);

        let node = policy.select(&mut tree, NodeId::ROOT).unwrap();

        assert_eq!(tree.get(node).mv(), Some(0));
        match tree.get(node).kind() {
            NodeKind::Alpha { prior, q, u } => {
                assert!((prior - 0.7).abs() < 1e-9);
                assert_eq!(q, 0.0);
                assert!((u - 0.7).abs() < 1e-9);
            }
            NodeKind::Uct => panic!("expected an alpha node"),
        }
    }

    #[test]
    fn test_alpha_expansion_fails_when_a_prior_is_missing() {
        let policy = AlphaTreePolicy::new(FixedEval { priors: Vec::new() });
        let mut tree = fresh_tree(&policy, 2, 2);

        let result = policy.select(&mut tree, NodeId::ROOT);

        assert!(matches!(result, Err(SearchError::Evaluator(_))));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_alpha_descent_follows_the_action_value() {
        let policy = AlphaTreePolicy::new(FixedEval {
            priors: vec![(0, 0.2), (1, 0.8)],
        });
        let mut tree = fresh_tree(&policy, 2, 2);

        policy.select(&mut tree, NodeId::ROOT).unwrap();
        policy.select(&mut tree, NodeId::ROOT).unwrap();
        let grandchild = policy.select(&mut tree, NodeId::ROOT).unwrap();

        // Unvisited alpha children score q + u = prior, so the walk picks
        // the move with the larger prior.
        let favored = tree.root().children()[1];
        assert_eq!(tree.get(favored).mv(), Some(1));
        assert_eq!(tree.get(grandchild).parent(), Some(favored));
    }
}
