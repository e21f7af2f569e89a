//! Fleet planning and marginal-cost pricing.
//!
//! [`Planner`] wraps the whole pipeline (instance validation, seeded
//! construction, time-boxed search) behind the two questions a dispatcher
//! asks: "how should my fleet carry these tasks?" and "how much more would
//! it cost to also carry this one?".

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::distance::DistanceMatrix;
use crate::error::PdpError;
use crate::models::{ProblemInstance, Task, Vehicle};
use crate::search::{SearchConfig, SearchResult, SearchRunner};
use crate::solution::Solution;

/// Seed used for the initial construction unless overridden.
pub const DEFAULT_SEED: u64 = 17;

/// Outcome of pricing one additional task.
#[derive(Debug, Clone)]
pub struct MarginalCost {
    /// Cost of the plan that includes the candidate task.
    pub cost_with_task: f64,

    /// `cost_with_task - baseline_cost`. May be negative when the search
    /// finds a better plan than the baseline.
    pub marginal: f64,

    /// Search result for the committed tasks plus the candidate. Keep
    /// `result.best` as the new baseline if the task is won.
    pub result: SearchResult,
}

/// Plans a fixed fleet over changing task sets.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use u_pdp::distance::DistanceMatrix;
/// use u_pdp::models::{Task, Vehicle};
/// use u_pdp::planner::Planner;
/// use u_pdp::search::SearchConfig;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)]);
/// let planner = Planner::new(
///     vec![Vehicle::new(0, 5), Vehicle::new(2, 5)],
///     dm,
///     SearchConfig::default(),
/// )
/// .unwrap();
///
/// let committed = vec![Task::new(2, 0, 1)];
/// let deadline = Instant::now() + Duration::from_millis(30);
/// let plan = planner.plan(committed.clone(), deadline).unwrap();
///
/// let deadline = Instant::now() + Duration::from_millis(30);
/// let priced = planner
///     .marginal_cost(committed, Task::new(3, 1, 2), plan.best_cost, deadline)
///     .unwrap();
/// assert!(priced.result.best.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    vehicles: Vec<Vehicle>,
    distances: Arc<DistanceMatrix>,
    config: SearchConfig,
    seed: u64,
    max_capacity: i32,
}

impl Planner {
    /// Creates a planner for the given fleet.
    ///
    /// # Errors
    ///
    /// [`PdpError::InvalidVehicle`] for malformed vehicles,
    /// [`PdpError::InvalidDistance`] for a negative or non-finite distance and
    /// [`PdpError::InvalidConfig`] for out-of-range search parameters.
    pub fn new(
        vehicles: Vec<Vehicle>,
        distances: DistanceMatrix,
        config: SearchConfig,
    ) -> Result<Self, PdpError> {
        config.validate()?;
        let fleet = ProblemInstance::new(Vec::new(), vehicles, distances)?;
        Ok(Self {
            max_capacity: fleet.max_capacity(),
            vehicles: fleet.vehicles().to_vec(),
            distances: Arc::clone(fleet.shared_distances()),
            config,
            seed: DEFAULT_SEED,
        })
    }

    /// Overrides the initial-construction seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Whether some vehicle can carry `task` at all.
    pub fn can_carry(&self, task: &Task) -> bool {
        task.weight() <= self.max_capacity
    }

    /// Plans `tasks` for the fleet, searching until `deadline`.
    ///
    /// # Errors
    ///
    /// Any error of [`ProblemInstance::new`], notably
    /// [`PdpError::Infeasible`] when a task fits no vehicle.
    pub fn plan(&self, tasks: Vec<Task>, deadline: Instant) -> Result<SearchResult, PdpError> {
        let instance = ProblemInstance::with_shared_distances(
            tasks,
            self.vehicles.clone(),
            Arc::clone(&self.distances),
        )?;
        let initial = Solution::initial(Arc::new(instance), self.seed);
        let result = SearchRunner::run(initial, deadline, &self.config);
        info!(
            tasks = result.best.num_tasks(),
            cost = result.best_cost,
            iterations = result.iterations,
            "plan computed"
        );
        Ok(result)
    }

    /// Prices `candidate` against a plan for `committed` whose cost was
    /// `baseline_cost`.
    ///
    /// # Errors
    ///
    /// Same as [`Planner::plan`]; a candidate no vehicle can carry yields
    /// [`PdpError::Infeasible`].
    pub fn marginal_cost(
        &self,
        mut committed: Vec<Task>,
        candidate: Task,
        baseline_cost: f64,
        deadline: Instant,
    ) -> Result<MarginalCost, PdpError> {
        committed.push(candidate);
        let result = self.plan(committed, deadline)?;
        let marginal = result.best_cost - baseline_cost;
        info!(
            weight = candidate.weight(),
            baseline = baseline_cost,
            marginal,
            "priced candidate task"
        );
        Ok(MarginalCost {
            cost_with_task: result.best_cost,
            marginal,
            result,
        })
    }
}
