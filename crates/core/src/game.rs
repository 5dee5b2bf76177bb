use std::fmt;

use crate::error::Result;

/// A game-environment abstraction for tree search.
///
/// This trait defines the capability contract any two-player,
/// perfect-information, turn-based game must implement to be searchable.
/// The implementor *is* the position: applying a move mutates the state in
/// place, and an independent snapshot is taken with `Clone`.
pub trait GameState: Clone + Send {
    /// A game move (e.g., a board cell, a house index)
    type Move: Copy + Eq + Send + fmt::Debug;

    /// A player identity (e.g., north/south, crosses/noughts)
    type Player: Copy + Eq + Send + fmt::Debug;

    /// Returns the player who must move next
    fn side_to_move(&self) -> Self::Player;

    /// Returns all legal moves from this state; an empty vector signals
    /// that the game is over
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies a move in place. Must be deterministic and must fail with
    /// [`GameError::IllegalMove`](crate::GameError::IllegalMove) (not
    /// silently no-op) if the move is illegal here.
    fn perform_move(&mut self, mv: Self::Move) -> Result<()>;

    /// Returns the scalar outcome of a finished game from the perspective
    /// of `side`. Fails with
    /// [`GameError::NotTerminal`](crate::GameError::NotTerminal) while
    /// legal moves remain.
    fn end_game_reward(&self, side: Self::Player) -> Result<f64>;
}
