//! Game implementations for engine validation.
//!
//! These games are used to verify the search before applying it to more
//! complex domains.

pub mod tictactoe;

pub use tictactoe::{Player, TicTacToeMove, TicTacToeState};
