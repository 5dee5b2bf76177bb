//! Position evaluation for network-guided search.
//!
//! The `Evaluator` trait is the seam where a policy/value network plugs
//! into the engine. Both the alpha tree policy (priors for expansion) and
//! the guided rollout (best move and value during simulation) consume the
//! same evaluation, so one evaluator instance is typically shared between
//! them through an `Arc`.

use std::sync::Arc;

use arbor_core::GameState;
use thiserror::Error;

/// Errors produced by an evaluator.
#[derive(Error, Debug)]
pub enum EvaluatorError {
    /// The evaluation itself failed, e.g. a model backend error.
    #[error("Evaluation failed: {0}")]
    Failed(String),

    /// The evaluator returned something the engine cannot use, e.g. no
    /// prior for a legal move.
    #[error("Malformed evaluation: {0}")]
    Malformed(String),
}

/// The result of evaluating one position.
#[derive(Clone, Debug)]
pub struct Evaluation<M> {
    /// Prior probability per legal move. Covers exactly the legal moves the
    /// evaluator was handed.
    pub priors: Vec<(M, f64)>,

    /// The move the evaluator considers strongest.
    pub best_move: M,

    /// Value estimate of the position from the perspective of the side
    /// the search is played for, in [-1, 1].
    pub value: f64,
}

impl<M: Copy + Eq> Evaluation<M> {
    /// Look up the prior assigned to `mv`.
    pub fn prior(&self, mv: M) -> Option<f64> {
        self.priors
            .iter()
            .find(|(m, _)| *m == mv)
            .map(|(_, p)| *p)
    }
}

/// A position evaluator: priors over the legal moves, a best move and a
/// scalar value estimate.
pub trait Evaluator<S: GameState> {
    /// Evaluate `state`. `legal_moves` is the move list the engine already
    /// computed for the position; the returned priors must cover it.
    fn evaluate(
        &self,
        state: &S,
        legal_moves: &[S::Move],
    ) -> std::result::Result<Evaluation<S::Move>, EvaluatorError>;
}

impl<S: GameState, E: Evaluator<S> + ?Sized> Evaluator<S> for &E {
    fn evaluate(
        &self,
        state: &S,
        legal_moves: &[S::Move],
    ) -> std::result::Result<Evaluation<S::Move>, EvaluatorError> {
        (**self).evaluate(state, legal_moves)
    }
}

impl<S: GameState, E: Evaluator<S> + ?Sized> Evaluator<S> for Arc<E> {
    fn evaluate(
        &self,
        state: &S,
        legal_moves: &[S::Move],
    ) -> std::result::Result<Evaluation<S::Move>, EvaluatorError> {
        (**self).evaluate(state, legal_moves)
    }
}

/// The no-knowledge baseline: uniform priors, the first legal move as the
/// best move and a neutral value. Useful for exercising the network-guided
/// machinery without a trained model.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformEvaluator;

impl<S: GameState> Evaluator<S> for UniformEvaluator {
    fn evaluate(
        &self,
        _state: &S,
        legal_moves: &[S::Move],
    ) -> std::result::Result<Evaluation<S::Move>, EvaluatorError> {
        if legal_moves.is_empty() {
            return Err(EvaluatorError::Malformed(
                "no legal moves to evaluate".to_string(),
            ));
        }
        let prior = 1.0 / legal_moves.len() as f64;
        Ok(Evaluation {
            priors: legal_moves.iter().map(|&mv| (mv, prior)).collect(),
            best_move: legal_moves[0],
            value: 0.0,
        })
    }
}
