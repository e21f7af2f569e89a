//! Search run statistics.

use std::time::Duration;

use crate::solution::Solution;

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best solution found.
    pub best: Solution,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations, including those with no neighbors.
    pub iterations: usize,

    /// Number of moves to a neighbor.
    pub accepted_moves: usize,

    /// Number of accepted moves that lowered the current cost.
    pub improving_moves: usize,

    /// Iterations whose neighborhood was empty.
    pub empty_neighborhoods: usize,

    /// Jumps back to a reservoir state (stochastic restart only).
    pub restarts: usize,

    /// Best-ever cost each time it improved, starting with the initial cost.
    pub cost_history: Vec<f64>,

    /// Wall-clock time spent in the search.
    pub elapsed: Duration,
}

impl SearchResult {
    /// Result for a search that performed no iterations.
    pub(crate) fn unchanged(initial: Solution, elapsed: Duration) -> Self {
        let cost = initial.cost();
        Self {
            best: initial,
            best_cost: cost,
            iterations: 0,
            accepted_moves: 0,
            improving_moves: 0,
            empty_neighborhoods: 0,
            restarts: 0,
            cost_history: vec![cost],
            elapsed,
        }
    }

    /// Relative improvement of the best cost over the initial cost, in
    /// `[0, 1]`. Zero when the initial cost was zero.
    pub fn improvement(&self) -> f64 {
        match self.cost_history.first() {
            Some(&initial) if initial > 0.0 => (initial - self.best_cost) / initial,
            _ => 0.0,
        }
    }
}
