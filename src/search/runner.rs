//! Search execution loop.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use super::config::{AcceptancePolicy, SearchConfig};
use super::result::SearchResult;
use crate::neighborhood::NeighborGenerator;
use crate::solution::Solution;

/// Executes a deadline-bounded local search.
///
/// The runner polls the clock between iterations and never starts an
/// iteration after the margin-adjusted deadline. The returned solution is
/// the best one observed, which is at least the initial solution.
///
/// The configuration is not validated here; see [`SearchConfig::validate`].
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use u_pdp::distance::DistanceMatrix;
/// use u_pdp::models::{Task, Vehicle};
/// use u_pdp::search::{SearchConfig, SearchRunner};
/// use u_pdp::solution::Solution;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
/// let tasks = vec![Task::new(2, 0, 1), Task::new(2, 1, 2), Task::new(1, 2, 0)];
/// let vehicles = vec![Vehicle::new(0, 4), Vehicle::new(2, 4)];
/// let initial = Solution::build(tasks, vehicles, dm, 17).unwrap();
/// let initial_cost = initial.cost();
///
/// let deadline = Instant::now() + Duration::from_millis(30);
/// let result = SearchRunner::run(initial, deadline, &SearchConfig::default().with_seed(1));
/// assert!(result.best_cost <= initial_cost);
/// assert!(result.best.validate().is_ok());
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search with an RNG seeded from `config.seed`, or from the
    /// OS when no seed is set.
    pub fn run(initial: Solution, deadline: Instant, config: &SearchConfig) -> SearchResult {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::run_with_rng(initial, deadline, config, &mut rng)
    }

    /// Runs the search with an explicit RNG for move selection.
    pub fn run_with_rng<R: Rng>(
        initial: Solution,
        deadline: Instant,
        config: &SearchConfig,
        rng: &mut R,
    ) -> SearchResult {
        let started = Instant::now();

        if initial.num_tasks() == 0 {
            debug!("no tasks to route, skipping search");
            return SearchResult::unchanged(initial, started.elapsed());
        }

        let limit = match deadline.checked_sub(config.safety_margin) {
            Some(limit) if started < limit => limit,
            _ => {
                warn!(
                    safety_margin = ?config.safety_margin,
                    "deadline already passed, returning initial solution"
                );
                return SearchResult::unchanged(initial, started.elapsed());
            }
        };

        debug!(
            tasks = initial.num_tasks(),
            vehicles = initial.num_vehicles(),
            policy = config.policy.name(),
            initial_cost = initial.cost(),
            budget = ?limit.saturating_duration_since(started),
            "starting search"
        );

        let generator = NeighborGenerator::new(config.families.clone());
        let mut state = SearchState::new(initial);

        // The first iteration also measures how much time to hold back.
        state.iterate(&generator, &config.policy, 1.0, rng);
        let reserve = started.elapsed().saturating_mul(config.margin_iterations);
        let limit = limit.checked_sub(reserve).unwrap_or(started);
        let span = limit.saturating_duration_since(started).as_secs_f64();

        loop {
            let now = Instant::now();
            if now >= limit {
                break;
            }
            let time_left = limit.duration_since(now).as_secs_f64() / span;
            state.iterate(&generator, &config.policy, time_left, rng);
        }

        let result = state.finish(started);
        debug!(
            iterations = result.iterations,
            accepted = result.accepted_moves,
            improving = result.improving_moves,
            empty = result.empty_neighborhoods,
            restarts = result.restarts,
            best_cost = result.best_cost,
            elapsed = ?result.elapsed,
            "search finished"
        );
        result
    }
}

/// Mutable state of one search run.
struct SearchState {
    current: Solution,
    best: Solution,
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
    empty_neighborhoods: usize,
    restarts: usize,
    cost_history: Vec<f64>,
    stagnation: usize,
    reservoir: Vec<Solution>,
    reservoir_seen: usize,
}

impl SearchState {
    fn new(initial: Solution) -> Self {
        Self {
            cost_history: vec![initial.cost()],
            best: initial.clone(),
            current: initial,
            iterations: 0,
            accepted_moves: 0,
            improving_moves: 0,
            empty_neighborhoods: 0,
            restarts: 0,
            stagnation: 0,
            reservoir: Vec::new(),
            reservoir_seen: 0,
        }
    }

    /// One iteration. `time_left` is the fraction of the search window
    /// remaining, in `[0, 1]`.
    fn iterate<R: Rng>(
        &mut self,
        generator: &NeighborGenerator,
        policy: &AcceptancePolicy,
        time_left: f64,
        rng: &mut R,
    ) {
        let neighbors = generator.generate(&self.current, rng);
        self.step(neighbors, policy, time_left, rng);
    }

    /// Applies `policy` to one iteration's neighbors of the current solution.
    fn step<R: Rng>(
        &mut self,
        mut neighbors: Vec<Solution>,
        policy: &AcceptancePolicy,
        time_left: f64,
        rng: &mut R,
    ) {
        self.iterations += 1;

        let improved = if neighbors.is_empty() {
            self.empty_neighborhoods += 1;
            false
        } else {
            match *policy {
                AcceptancePolicy::GreedyStochastic { probability } => {
                    let next = pick_greedy(neighbors, probability, rng);
                    self.accept(next)
                }
                AcceptancePolicy::SimulatedAnnealing {
                    initial_temperature,
                    final_temperature,
                } => {
                    let temperature =
                        annealing_temperature(initial_temperature, final_temperature, time_left);
                    // Offered even if the random pick below is rejected.
                    let improved = self.offer_best(&neighbors[cheapest(&neighbors)]);

                    let pick = rng.random_range(0..neighbors.len());
                    let delta = neighbors[pick].cost() - self.current.cost();
                    let accept = delta < 0.0
                        || (temperature > 0.0
                            && rng.random_range(0.0..1.0) < (-delta / temperature).exp());
                    if accept {
                        self.accept(neighbors.swap_remove(pick));
                    }
                    improved
                }
                AcceptancePolicy::StochasticRestart {
                    probability,
                    reservoir_size,
                    reservoir_probability,
                    ..
                } => {
                    let next = pick_greedy(neighbors, probability, rng);
                    let improved = self.accept(next);
                    if !improved && rng.random_range(0.0..1.0) < reservoir_probability {
                        self.remember(reservoir_size, rng);
                    }
                    improved
                }
            }
        };

        if let AcceptancePolicy::StochasticRestart {
            stagnation_threshold,
            ..
        } = *policy
        {
            self.track_stagnation(improved, stagnation_threshold, rng);
        }
    }

    /// Moves to `next`. Returns whether the best-ever solution improved.
    fn accept(&mut self, next: Solution) -> bool {
        self.accepted_moves += 1;
        if next.cost() < self.current.cost() {
            self.improving_moves += 1;
        }
        let improved = self.offer_best(&next);
        self.current = next;
        improved
    }

    fn offer_best(&mut self, candidate: &Solution) -> bool {
        if candidate.cost() < self.best.cost() {
            trace!(
                iteration = self.iterations,
                cost = candidate.cost(),
                "new best solution"
            );
            self.best = candidate.clone();
            self.cost_history.push(candidate.cost());
            true
        } else {
            false
        }
    }

    /// Offers the current solution to the restart reservoir.
    fn remember<R: Rng>(&mut self, capacity: usize, rng: &mut R) {
        if capacity == 0 {
            return;
        }
        self.reservoir_seen += 1;
        if self.reservoir.len() < capacity {
            self.reservoir.push(self.current.clone());
        } else {
            let slot = rng.random_range(0..self.reservoir_seen);
            if slot < capacity {
                self.reservoir[slot] = self.current.clone();
            }
        }
    }

    fn track_stagnation<R: Rng>(&mut self, improved: bool, threshold: usize, rng: &mut R) {
        if improved {
            self.stagnation = 0;
            return;
        }
        self.stagnation += 1;
        if self.stagnation >= threshold && !self.reservoir.is_empty() {
            let pick = rng.random_range(0..self.reservoir.len());
            self.current = self.reservoir[pick].clone();
            self.restarts += 1;
            self.stagnation = 0;
            trace!(
                iteration = self.iterations,
                cost = self.current.cost(),
                "restarting from reservoir"
            );
        }
    }

    fn finish(self, started: Instant) -> SearchResult {
        SearchResult {
            best_cost: self.best.cost(),
            best: self.best,
            iterations: self.iterations,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            empty_neighborhoods: self.empty_neighborhoods,
            restarts: self.restarts,
            cost_history: self.cost_history,
            elapsed: started.elapsed(),
        }
    }
}

/// Temperature interpolated linearly between `initial` (all time left) and
/// `last` (none left).
fn annealing_temperature(initial: f64, last: f64, time_left: f64) -> f64 {
    initial * time_left + last * (1.0 - time_left)
}

/// Index of the minimum-cost solution. `neighbors` must be non-empty.
fn cheapest(neighbors: &[Solution]) -> usize {
    neighbors
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cost().total_cmp(&b.cost()))
        .map_or(0, |(i, _)| i)
}

/// With probability `probability` the cheapest neighbor, otherwise a
/// uniformly random one.
fn pick_greedy<R: Rng>(mut neighbors: Vec<Solution>, probability: f64, rng: &mut R) -> Solution {
    let pick = if rng.random_range(0.0..1.0) < probability {
        cheapest(&neighbors)
    } else {
        rng.random_range(0..neighbors.len())
    };
    neighbors.swap_remove(pick)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{ProblemInstance, Task, Vehicle};

    fn random_instance(num_tasks: usize, num_vehicles: usize, seed: u64) -> Arc<ProblemInstance> {
        let mut rng = StdRng::seed_from_u64(seed);
        let coords: Vec<(f64, f64)> = (0..12)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let tasks = (0..num_tasks)
            .map(|_| {
                Task::new(
                    rng.random_range(1..=4),
                    rng.random_range(0..12),
                    rng.random_range(0..12),
                )
            })
            .collect();
        let vehicles = (0..num_vehicles)
            .map(|v| Vehicle::new(v % 12, 6).with_cost_per_distance(1.0 + v as f64 * 0.5))
            .collect();
        Arc::new(
            ProblemInstance::new(tasks, vehicles, DistanceMatrix::from_coordinates(&coords))
                .expect("valid instance"),
        )
    }

    fn assert_sound(result: &SearchResult, initial_cost: f64) {
        assert!(result.best.validate().is_ok());
        assert!((result.best_cost - result.best.compute_cost()).abs() < 1e-9);
        assert!(result.best_cost <= initial_cost + 1e-9);
        assert_eq!(result.cost_history.first().copied(), Some(initial_cost));
        assert_eq!(result.cost_history.last().copied(), Some(result.best_cost));
        assert!(result.cost_history.windows(2).all(|w| w[1] < w[0]));
        assert!(result.improving_moves <= result.accepted_moves);
        assert!(result.empty_neighborhoods <= result.iterations);
    }

    fn window(ms: u64) -> Instant {
        Instant::now() + Duration::from_millis(ms)
    }

    #[test]
    fn test_single_task_keeps_optimal_cost() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 3.0);
        dm.set(1, 0, 3.0);
        let vehicles = vec![Vehicle::new(0, 10).with_cost_per_distance(5.0)];
        let sol = Solution::build(vec![Task::new(4, 0, 1)], vehicles, dm, 17).expect("feasible");
        assert!((sol.cost() - 15.0).abs() < 1e-10);

        let config = SearchConfig::default().with_seed(3);
        let result = SearchRunner::run(sol, window(30), &config);
        assert!(result.best_cost <= 15.0 + 1e-10);
        assert!(result.iterations > 0);
        // No move family applies to a single vehicle with a single task.
        assert_eq!(result.empty_neighborhoods, result.iterations);
        assert_eq!(result.accepted_moves, 0);
    }

    #[test]
    fn test_zero_tasks_returns_immediately() {
        let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 1.0)]);
        let vehicles = vec![Vehicle::new(0, 5), Vehicle::new(1, 5)];
        let sol = Solution::build(vec![], vehicles, dm, 17).expect("feasible");

        let result = SearchRunner::run(sol, window(10_000), &SearchConfig::default());
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_cost, 0.0);
        assert!(result.elapsed < Duration::from_secs(1));
        assert!(result.best.to_routes().iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_past_deadline_returns_initial() {
        let sol = Solution::initial(random_instance(6, 2, 1), 17);
        let initial_cost = sol.cost();
        let config = SearchConfig::default().with_safety_margin(Duration::from_millis(50));

        let result = SearchRunner::run(sol, window(10), &config);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_cost, initial_cost);
        assert_eq!(result.cost_history, vec![initial_cost]);
    }

    #[test]
    fn test_returns_before_deadline() {
        let sol = Solution::initial(random_instance(20, 3, 2), 17);
        let deadline = window(60);
        let config = SearchConfig::new(AcceptancePolicy::greedy_stochastic(0.9)).with_seed(5);

        let result = SearchRunner::run(sol, deadline, &config);
        assert!(Instant::now() <= deadline);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_greedy_stochastic_improves() {
        let sol = Solution::initial(random_instance(10, 3, 3), 17);
        let initial_cost = sol.cost();
        let config = SearchConfig::new(AcceptancePolicy::greedy_stochastic(0.95)).with_seed(11);

        let result = SearchRunner::run(sol, window(100), &config);
        assert_sound(&result, initial_cost);
        assert!(result.best_cost < initial_cost);
        assert!(result.improvement() > 0.0);
        assert_eq!(result.restarts, 0);
    }

    #[test]
    fn test_simulated_annealing_is_sound() {
        let sol = Solution::initial(random_instance(10, 3, 4), 17);
        let initial_cost = sol.cost();
        let config =
            SearchConfig::new(AcceptancePolicy::simulated_annealing(50.0, 1.0)).with_seed(12);

        let result = SearchRunner::run(sol, window(80), &config);
        assert_sound(&result, initial_cost);
        assert!(result.iterations > 1);
    }

    #[test]
    fn test_stochastic_restart_jumps() {
        let sol = Solution::initial(random_instance(10, 3, 5), 17);
        let initial_cost = sol.cost();
        let config = SearchConfig::new(AcceptancePolicy::StochasticRestart {
            probability: 0.5,
            stagnation_threshold: 5,
            reservoir_size: 4,
            reservoir_probability: 1.0,
        })
        .with_seed(13);

        let result = SearchRunner::run(sol, window(100), &config);
        assert_sound(&result, initial_cost);
        assert!(result.restarts > 0);
    }

    #[test]
    fn test_single_family_search() {
        let sol = Solution::initial(random_instance(8, 1, 6), 17);
        let initial_cost = sol.cost();
        let config = SearchConfig::new(AcceptancePolicy::greedy_stochastic(1.0))
            .with_families(vec![crate::neighborhood::MoveFamily::Reorder])
            .with_seed(14);

        let result = SearchRunner::run(sol, window(50), &config);
        assert_sound(&result, initial_cost);
        // Reordering never changes which vehicle carries a task.
        assert_eq!(result.best.to_routes()[0].tasks().len(), 8);
    }

    #[test]
    fn test_annealing_temperature_is_linear_in_time_left() {
        assert!((annealing_temperature(1000.0, 100.0, 1.0) - 1000.0).abs() < 1e-9);
        assert!((annealing_temperature(1000.0, 100.0, 0.0) - 100.0).abs() < 1e-9);
        assert!((annealing_temperature(1000.0, 100.0, 0.5) - 550.0).abs() < 1e-9);
        assert!((annealing_temperature(1000.0, 100.0, 0.25) - 325.0).abs() < 1e-9);
    }

    /// One vehicle at location 0 on a line; task 0 runs 0 -> 30 and task 1
    /// runs 10 -> 20. Returns solutions costing 60, 70 and 30.
    fn ordered_routes() -> (Solution, Solution, Solution) {
        let coords = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)];
        let inst = Arc::new(
            ProblemInstance::new(
                vec![Task::new(1, 0, 3), Task::new(1, 1, 2)],
                vec![Vehicle::new(0, 10)],
                DistanceMatrix::from_coordinates(&coords),
            )
            .expect("valid instance"),
        );
        let current = Solution::from_routes(Arc::clone(&inst), &[vec![0, 1, 2, 3]]);
        let worse = Solution::from_routes(Arc::clone(&inst), &[vec![2, 3, 0, 1]]);
        let cheaper = Solution::from_routes(inst, &[vec![0, 2, 3, 1]]);
        assert!((current.cost() - 60.0).abs() < 1e-9);
        assert!((worse.cost() - 70.0).abs() < 1e-9);
        assert!((cheaper.cost() - 30.0).abs() < 1e-9);
        (current, worse, cheaper)
    }

    #[test]
    fn test_annealing_offers_cheapest_neighbor_to_best() {
        let (current, worse, cheaper) = ordered_routes();
        // Near-zero temperature: worsening picks are always rejected.
        let policy = AcceptancePolicy::simulated_annealing(1e-9, 1e-9);
        let mut rejected_picks = 0;

        for seed in 0..32 {
            let mut state = SearchState::new(current.clone());
            let mut rng = StdRng::seed_from_u64(seed);
            let neighbors = vec![worse.clone(), worse.clone(), worse.clone(), cheaper.clone()];
            state.step(neighbors, &policy, 0.5, &mut rng);

            assert!((state.best.cost() - 30.0).abs() < 1e-9);
            assert_eq!(state.cost_history, vec![60.0, 30.0]);
            if state.accepted_moves == 0 {
                rejected_picks += 1;
                assert_eq!(state.current.successors(), current.successors());
            } else {
                assert_eq!(state.current.successors(), cheaper.successors());
            }
        }
        assert!(rejected_picks > 0);
    }

    #[test]
    fn test_annealing_accepts_worse_when_hot() {
        let (current, worse, _) = ordered_routes();
        let policy = AcceptancePolicy::simulated_annealing(1e12, 1e12);
        let mut state = SearchState::new(current);
        let mut rng = StdRng::seed_from_u64(3);
        state.step(vec![worse.clone()], &policy, 1.0, &mut rng);

        assert_eq!(state.accepted_moves, 1);
        assert_eq!(state.current.successors(), worse.successors());
        assert!((state.best.cost() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_reservoir_sampling_bounded() {
        let sol = Solution::initial(random_instance(4, 2, 7), 17);
        let mut state = SearchState::new(sol);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            state.remember(3, &mut rng);
        }
        assert_eq!(state.reservoir.len(), 3);
        assert_eq!(state.reservoir_seen, 50);
    }

    #[test]
    fn test_pick_greedy_with_certainty_takes_cheapest() {
        let inst = random_instance(6, 2, 8);
        let candidates: Vec<Solution> = (0..10).map(|s| Solution::initial(inst.clone(), s)).collect();
        let min = candidates
            .iter()
            .map(Solution::cost)
            .fold(f64::INFINITY, f64::min);
        let mut rng = StdRng::seed_from_u64(2);
        let picked = pick_greedy(candidates, 1.0, &mut rng);
        assert_eq!(picked.cost(), min);
    }
}
