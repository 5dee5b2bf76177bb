//! Default policies: playing a position out to the end of the game.
//!
//! The second phase of every simulation. Given the node the tree policy
//! settled on, a default policy plays the game to completion and reports a
//! reward. Rewards are always from the perspective of the side the search
//! is played for, no matter whose turn it is along the playout.

use std::cell::RefCell;

use arbor_core::GameState;
use rand::Rng;

use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::node::Node;

/// Strategy for the simulation phase.
pub trait DefaultPolicy<S: GameState> {
    /// Play out the game from `node` and return the reward from
    /// `our_side`'s perspective. The node itself is left untouched; the
    /// playout runs on a copy of its state.
    fn simulate(&self, node: &Node<S>, our_side: S::Player) -> Result<f64>;
}

/// Uniformly random playout.
pub struct RandomRollout<R: Rng> {
    rng: RefCell<R>,
}

impl<R: Rng> RandomRollout<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }
}

impl<S: GameState, R: Rng> DefaultPolicy<S> for RandomRollout<R> {
    fn simulate(&self, node: &Node<S>, our_side: S::Player) -> Result<f64> {
        let mut state = node.state().clone();
        loop {
            let moves = state.legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[self.rng.borrow_mut().gen_range(0..moves.len())];
            state.perform_move(mv)?;
        }
        Ok(state.end_game_reward(our_side)?)
    }
}

/// Playout steered by an evaluator, always taking its best move.
///
/// The reward blends the true terminal reward with the evaluator's last
/// value estimate before the game ended:
/// `(1 - lambda) * value + lambda * reward`. At `lambda` 1.0 (the default)
/// the game outcome alone counts; at 0.0 the playout only serves to reach
/// a position the evaluator is confident about. A simulation that starts
/// on a terminal node never evaluates anything and blends against a
/// neutral 0.0.
pub struct GuidedRollout<E> {
    evaluator: E,
    lambda: f64,
}

impl<E> GuidedRollout<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            lambda: 1.0,
        }
    }

    /// Override the blend weight of the terminal reward.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }
}

impl<S: GameState, E: Evaluator<S>> DefaultPolicy<S> for GuidedRollout<E> {
    fn simulate(&self, node: &Node<S>, our_side: S::Player) -> Result<f64> {
        let mut state = node.state().clone();
        let mut value = 0.0;
        loop {
            let moves = state.legal_moves();
            if moves.is_empty() {
                break;
            }
            let eval = self.evaluator.evaluate(&state, &moves)?;
            value = eval.value;
            state.perform_move(eval.best_move)?;
        }
        let reward = state.end_game_reward(our_side)?;
        Ok((1.0 - self.lambda) * value + self.lambda * reward)
    }
}
