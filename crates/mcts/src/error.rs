//! Error types for the search engine.

use arbor_core::GameError;
use thiserror::Error;

use crate::evaluator::EvaluatorError;

/// Errors surfaced by tree policies, rollouts and the search loop.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A child was requested from a node that has none, e.g. when the
    /// search is asked for a move in a finished position.
    #[error("No children to select from")]
    NoChildren,

    /// The game implementation rejected a move or a reward query.
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// The evaluator failed or produced an unusable evaluation.
    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
