//! Feasible neighborhood generation.
//!
//! - [`reassign_neighbors`]: move a pickup/delivery pair to the front of another vehicle
//! - [`reorder_neighbors`]: slide a pickup or delivery along its route
//! - [`swap_neighbors`]: exchange two pairs on the same route
//!
//! Every generated neighbor is a fresh [`Solution`] that satisfies all
//! structural invariants; infeasible candidates are never materialized.

mod reassign;
mod reorder;
mod swap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::solution::Solution;

pub use reassign::reassign_neighbors;
pub use reorder::reorder_neighbors;
pub use swap::swap_neighbors;

/// One structural edit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveFamily {
    /// Move a pair to the front of another vehicle's route.
    Reassign,
    /// Slide one action of a pair within its route.
    Reorder,
    /// Exchange two pairs within a route.
    Swap,
}

impl MoveFamily {
    /// All move families, in generation order.
    pub const ALL: [MoveFamily; 3] = [MoveFamily::Reassign, MoveFamily::Reorder, MoveFamily::Swap];

    /// Generates this family's neighbors for a random choice of vehicle and
    /// pair.
    pub fn generate<R: Rng>(self, solution: &Solution, rng: &mut R) -> Vec<Solution> {
        let neighbors = match self {
            MoveFamily::Reassign => reassign_neighbors(solution, rng),
            MoveFamily::Reorder => reorder_neighbors(solution, rng),
            MoveFamily::Swap => swap_neighbors(solution, rng),
        };
        debug_assert!(
            neighbors.iter().all(|n| n.validate().is_ok()),
            "{self:?} produced a solution violating route invariants"
        );
        neighbors
    }
}

/// Produces candidate solutions one move away from a given solution.
///
/// Each call runs every configured family once, with fresh random choices,
/// and concatenates the results. An empty result means no move was
/// available this round.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_pdp::distance::DistanceMatrix;
/// use u_pdp::models::{Task, Vehicle};
/// use u_pdp::neighborhood::NeighborGenerator;
/// use u_pdp::solution::Solution;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let tasks = vec![Task::new(1, 0, 1), Task::new(1, 1, 2), Task::new(1, 2, 0)];
/// let vehicles = vec![Vehicle::new(0, 3), Vehicle::new(2, 3)];
/// let sol = Solution::build(tasks, vehicles, dm, 17).unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let neighbors = NeighborGenerator::default().generate(&sol, &mut rng);
/// assert!(neighbors.iter().all(|n| n.validate().is_ok()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborGenerator {
    families: Vec<MoveFamily>,
}

impl NeighborGenerator {
    /// Creates a generator using the given move families.
    pub fn new(families: Vec<MoveFamily>) -> Self {
        Self { families }
    }

    /// The configured move families.
    pub fn families(&self) -> &[MoveFamily] {
        &self.families
    }

    /// Generates neighbors of `solution`.
    pub fn generate<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Vec<Solution> {
        let mut neighbors = Vec::new();
        for family in &self.families {
            neighbors.extend(family.generate(solution, rng));
        }
        neighbors
    }

    /// Generates neighbors of `solution` using a single move family,
    /// whether or not it is among the configured ones.
    pub fn generate_family<R: Rng>(
        &self,
        family: MoveFamily,
        solution: &Solution,
        rng: &mut R,
    ) -> Vec<Solution> {
        family.generate(solution, rng)
    }
}

impl Default for NeighborGenerator {
    fn default() -> Self {
        Self::new(MoveFamily::ALL.to_vec())
    }
}
