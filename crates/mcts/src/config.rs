//! Search configuration parameters.

use std::time::Duration;

/// Exploration constant for the prior-weighted bonus of network-guided
/// nodes.
pub const DEFAULT_C_PUCT: f64 = 10.0;

/// Knobs controlling one run of the search loop.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Wall-clock budget for a single search. The loop checks the deadline
    /// after every simulation, so at least one simulation always runs and
    /// the final one is allowed to finish.
    pub time_budget: Duration,

    /// Exploration constant for network-guided selection. Unused by plain
    /// UCT trees.
    pub c_puct: f64,
}

impl SearchConfig {
    /// Tournament-style settings: a full minute per move.
    pub fn standard() -> Self {
        Self {
            time_budget: Duration::from_secs(60),
            c_puct: DEFAULT_C_PUCT,
        }
    }

    /// Quick settings for interactive play and tests.
    pub fn fast() -> Self {
        Self {
            time_budget: Duration::from_secs(1),
            c_puct: DEFAULT_C_PUCT,
        }
    }

    /// Replace the wall-clock budget.
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Replace the exploration constant for network-guided selection.
    pub fn with_c_puct(mut self, c_puct: f64) -> Self {
        self.c_puct = c_puct;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::standard()
    }
}
