//! The search loop.
//!
//! Ties the two policies together: every iteration asks the tree policy
//! for a node, asks the default policy for a reward, and backpropagates.
//! The loop runs until the wall-clock budget expires or a cancel token
//! fires, then answers with the most visited root child.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arbor_core::GameState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::evaluator::Evaluator;
use crate::node::NodeId;
use crate::policy::{AlphaTreePolicy, TreePolicy, UctTreePolicy};
use crate::rollout::{DefaultPolicy, GuidedRollout, RandomRollout};
use crate::select::select_robust_child;
use crate::tree::Tree;

/// Shared flag for stopping a running search from another thread.
///
/// Cancelling is sticky until the next search begins: `search` clears the
/// flag on entry, so one token can serve a whole sequence of searches.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search holding this token to stop after its current
    /// simulation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Monte Carlo tree search engine.
///
/// Generic over:
/// - `S`: the game being played
/// - `T`: the tree policy (selection and expansion)
/// - `D`: the default policy (simulation)
pub struct Mcts<S: GameState, T: TreePolicy<S>, D: DefaultPolicy<S>> {
    tree_policy: T,
    default_policy: D,
    config: SearchConfig,
    cancel: CancelToken,
    _state: PhantomData<S>,
}

impl<S, T, D> Mcts<S, T, D>
where
    S: GameState,
    T: TreePolicy<S>,
    D: DefaultPolicy<S>,
{
    /// Assemble an engine from its two policies and a configuration.
    pub fn new(tree_policy: T, default_policy: D, config: SearchConfig) -> Self {
        Self {
            tree_policy,
            default_policy,
            config,
            cancel: CancelToken::new(),
            _state: PhantomData,
        }
    }

    /// A token that stops this engine's running search from another
    /// thread. The flag is cleared every time a search begins.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search `state` and return the strongest move found.
    ///
    /// A fresh tree is built over a copy of `state`, simulations run until
    /// the budget expires or the token fires, and the most visited root
    /// child wins. The deadline is only checked between simulations, so at
    /// least one always completes and a zero budget still yields a move.
    /// All rewards are taken from the perspective of the side to move at
    /// `state`.
    ///
    /// # Errors
    /// Returns [`SearchError::NoChildren`] if `state` is already terminal,
    /// and propagates game and evaluator failures out of the simulations.
    pub fn search(&mut self, state: &S) -> Result<S::Move> {
        let started = Instant::now();
        let deadline = started + self.config.time_budget;
        self.cancel.0.store(false, Ordering::Relaxed);

        let our_side = state.side_to_move();
        let mut tree = Tree::with_root(self.tree_policy.root_node(state.clone()))
            .with_c_puct(self.config.c_puct);
        if tree.root().is_terminal() {
            return Err(SearchError::NoChildren);
        }

        let mut iterations: u64 = 0;
        loop {
            // SELECT + EXPAND: the tree policy picks the node to simulate.
            let node = self.tree_policy.select(&mut tree, NodeId::ROOT)?;

            // SIMULATE + BACKPROPAGATE: reward the node's ancestors.
            let reward = self.default_policy.simulate(tree.get(node), our_side)?;
            tree.backpropagate(node, reward);

            iterations += 1;
            trace!(iterations, node = ?node, reward, "simulation finished");

            if self.cancel.is_cancelled() || Instant::now() >= deadline {
                break;
            }
        }

        let best = select_robust_child(&tree, NodeId::ROOT)?;
        // INVARIANT: every non-root node carries the move that created it.
        let mv = match tree.get(best).mv() {
            Some(mv) => mv,
            None => panic!("BUG: non-root node carries no move"),
        };
        debug!(
            iterations,
            nodes = tree.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            chosen = ?mv,
            "search finished"
        );
        Ok(mv)
    }
}

impl<S: GameState> Mcts<S, UctTreePolicy, RandomRollout<StdRng>> {
    /// Classic UCT with random rollouts at tournament settings.
    pub fn standard() -> Self {
        Self::new(
            UctTreePolicy::new(),
            RandomRollout::new(StdRng::from_entropy()),
            SearchConfig::standard(),
        )
    }

    /// Classic UCT with random rollouts at quick settings.
    pub fn fast() -> Self {
        Self::new(
            UctTreePolicy::new(),
            RandomRollout::new(StdRng::from_entropy()),
            SearchConfig::fast(),
        )
    }
}

impl<S, E> Mcts<S, AlphaTreePolicy<E>, GuidedRollout<E>>
where
    S: GameState,
    E: Evaluator<S> + Clone,
{
    /// Network-guided engine: the same evaluator drives both expansion
    /// priors and guided playouts. Pass an `Arc` to share a heavyweight
    /// model.
    pub fn alpha(evaluator: E, config: SearchConfig) -> Self {
        Self::new(
            AlphaTreePolicy::new(evaluator.clone()),
            GuidedRollout::new(evaluator),
            config,
        )
    }
}
