//! Monte Carlo tree search over pluggable tree and rollout policies.
//!
//! This crate provides a generic MCTS engine for any two-player,
//! perfect-information game implementing the `arbor_core::GameState`
//! trait. A search is assembled from two strategies: a [`TreePolicy`]
//! deciding where the tree grows, and a [`DefaultPolicy`] playing
//! positions out to the end of the game.
//!
//! # Features
//!
//! - **Generic**: works with any `GameState` implementation
//! - **Two tree disciplines**: classic UCT, and network-guided nodes
//!   carrying priors and action values fed by an [`Evaluator`]
//! - **Pluggable simulation**: uniformly random playouts, or playouts
//!   steered by the evaluator's best move and value estimate
//! - **Budgeted**: wall-clock bounded, with cooperative cancellation
//!   through a [`CancelToken`]
//!
//! # Example
//!
//! ```
//! use arbor_core::GameState;
//! use arbor_mcts::games::TicTacToeState;
//! use arbor_mcts::{Mcts, RandomRollout, SearchConfig, UctTreePolicy};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::time::Duration;
//!
//! let config = SearchConfig::fast().with_time_budget(Duration::from_millis(10));
//! let rollout = RandomRollout::new(ChaCha8Rng::seed_from_u64(42));
//! let mut engine = Mcts::new(UctTreePolicy::new(), rollout, config);
//!
//! let state = TicTacToeState::new();
//! let mv = engine.search(&state).unwrap();
//! assert!(state.legal_moves().contains(&mv));
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod games;
pub mod node;
pub mod policy;
pub mod rollout;
pub mod search;
pub mod select;
pub mod tree;

pub use config::{SearchConfig, DEFAULT_C_PUCT};
pub use error::{Result, SearchError};
pub use evaluator::{Evaluation, Evaluator, EvaluatorError, UniformEvaluator};
pub use node::{Node, NodeId, NodeKind};
pub use policy::{AlphaTreePolicy, TreePolicy, UctTreePolicy};
pub use rollout::{DefaultPolicy, GuidedRollout, RandomRollout};
pub use search::{CancelToken, Mcts};
pub use select::{
    lower_confidence_interval, select_action_value_child, select_best_child, select_max_child,
    select_robust_child, select_secure_child, uct_reward, DEFAULT_EXPLORATION,
};
pub use tree::Tree;
