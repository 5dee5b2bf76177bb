//! Arbor Core - Game-environment abstractions
//!
//! This crate provides the core [`GameState`] trait: the capability contract
//! any two-player, perfect-information, turn-based game must implement to be
//! searchable by the MCTS engine. The engine never inspects a board; it only
//! enumerates legal moves, applies them to cloned snapshots, and asks a
//! finished game for its side-relative reward.
//!
//! # Types
//!
//! - [`GameState`] - Trait for game-state implementations
//! - [`GameError`] - Errors surfaced by the contract

mod error;
mod game;

pub use error::{GameError, Result};
pub use game::GameState;
