use thiserror::Error;

/// Errors surfaced by the game-environment contract
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Game is not terminal")]
    NotTerminal,
}

/// Convenience Result type for game-environment operations
pub type Result<T> = std::result::Result<T, GameError>;
