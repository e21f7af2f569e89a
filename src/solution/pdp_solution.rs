//! Array-backed pickup-and-delivery solution.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::distance::DistanceMatrix;
use crate::error::PdpError;
use crate::models::{ProblemInstance, SlotLayout, Task, Vehicle, NIL};

use super::chain::Chain;

/// An assignment of every task to one vehicle together with the order in
/// which each vehicle performs its pickups and deliveries.
///
/// Routes are stored as an implicit linked list: `next[slot]` is the slot
/// visited after `slot`, or [`NIL`] at the end of a chain. Each vehicle's
/// route is the chain starting at its start slot. The problem data is
/// shared through an [`Arc`], so cloning a solution only copies the
/// successor array.
///
/// A solution is never edited in place once built; neighborhood moves go
/// through [`Solution::edit`], which returns a new solution with its cost
/// recomputed.
///
/// # Examples
///
/// ```
/// use u_pdp::distance::DistanceMatrix;
/// use u_pdp::models::{Task, Vehicle};
/// use u_pdp::solution::Solution;
///
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 3.0, 3.0, 0.0]).unwrap();
/// let tasks = vec![Task::new(4, 0, 1)];
/// let vehicles = vec![Vehicle::new(0, 10).with_cost_per_distance(5.0)];
///
/// let sol = Solution::build(tasks, vehicles, dm, 17).unwrap();
/// assert!((sol.cost() - 15.0).abs() < 1e-10);
/// assert!(sol.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Solution {
    instance: Arc<ProblemInstance>,
    next: Vec<usize>,
    cost: f64,
}

impl Solution {
    /// Validates the input and builds a seeded initial solution.
    ///
    /// # Errors
    ///
    /// Any error of [`ProblemInstance::new`], notably
    /// [`PdpError::Infeasible`] when a task fits no vehicle.
    pub fn build(
        tasks: Vec<Task>,
        vehicles: Vec<Vehicle>,
        distances: DistanceMatrix,
        seed: u64,
    ) -> Result<Self, PdpError> {
        let instance = ProblemInstance::new(tasks, vehicles, distances)?;
        Ok(Self::initial(Arc::new(instance), seed))
    }

    /// Builds a random feasible solution.
    ///
    /// Tasks are visited in a shuffled order; each one is appended (pickup
    /// immediately followed by delivery) to a randomly drawn vehicle, redrawn
    /// until the vehicle's capacity fits the task's weight. Because the load
    /// drops back to zero after each delivery, the gross capacity check is
    /// enough. The same seed always yields the same solution.
    pub fn initial(instance: Arc<ProblemInstance>, seed: u64) -> Self {
        let layout = instance.layout();
        let mut next = vec![NIL; layout.len()];
        let mut rng = StdRng::seed_from_u64(seed);

        let mut tails: Vec<usize> = (0..layout.num_vehicles())
            .map(|v| layout.start(v))
            .collect();
        let mut order: Vec<usize> = (0..layout.num_tasks()).collect();
        order.shuffle(&mut rng);

        for task in order {
            let weight = instance.tasks()[task].weight();
            // Terminates: instance validation guarantees some vehicle fits.
            let vehicle = loop {
                let v = rng.random_range(0..layout.num_vehicles());
                if instance.vehicles()[v].capacity() >= weight {
                    break v;
                }
            };
            let (pickup, delivery) = (layout.pickup(task), layout.delivery(task));
            next[tails[vehicle]] = pickup;
            next[pickup] = delivery;
            tails[vehicle] = delivery;
        }

        Self::from_successors(instance, next)
    }

    /// Wraps an explicit successor array and computes its cost.
    ///
    /// The array is not checked; call [`Solution::validate`] when it comes
    /// from an untrusted source.
    pub fn from_successors(instance: Arc<ProblemInstance>, next: Vec<usize>) -> Self {
        debug_assert_eq!(next.len(), instance.layout().len());
        let mut solution = Self {
            instance,
            next,
            cost: 0.0,
        };
        solution.cost = solution.compute_cost();
        solution
    }

    /// Builds a solution from explicit per-vehicle slot sequences.
    ///
    /// `routes[v]` lists the action slots of vehicle `v` in visiting order.
    /// Vehicles without an entry get an empty route.
    pub fn from_routes(instance: Arc<ProblemInstance>, routes: &[Vec<usize>]) -> Self {
        let layout = instance.layout();
        let mut next = vec![NIL; layout.len()];
        for (v, route) in routes.iter().enumerate() {
            relink(&mut next, layout.start(v), route);
        }
        Self::from_successors(instance, next)
    }

    /// Returns a copy of this solution with `edit` applied to the successor
    /// array and the cost recomputed from scratch.
    pub fn edit<F>(&self, edit: F) -> Self
    where
        F: FnOnce(&mut [usize]),
    {
        let mut next = self.next.clone();
        edit(&mut next);
        Self::from_successors(Arc::clone(&self.instance), next)
    }

    /// Total cost: for every vehicle, its cost per distance times the
    /// distance driven from home along its chain.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Recomputes the cost by walking every chain.
    pub fn compute_cost(&self) -> f64 {
        (0..self.num_vehicles())
            .map(|v| self.instance.vehicles()[v].cost_per_distance() * self.route_distance(v))
            .sum()
    }

    /// Distance driven by `vehicle`, from its home to its last action.
    pub fn route_distance(&self, vehicle: usize) -> f64 {
        let mut current = self.layout().start(vehicle);
        let mut total = 0.0;
        for slot in self.chain(vehicle) {
            total += self.instance.slot_distance(current, slot);
            current = slot;
        }
        total
    }

    /// The shared problem instance.
    pub fn instance(&self) -> &Arc<ProblemInstance> {
        &self.instance
    }

    /// Slot addressing of the instance.
    pub fn layout(&self) -> SlotLayout {
        self.instance.layout()
    }

    /// Number of tasks.
    pub fn num_tasks(&self) -> usize {
        self.instance.num_tasks()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.instance.num_vehicles()
    }

    /// The raw successor array.
    pub fn successors(&self) -> &[usize] {
        &self.next
    }

    /// Successor of `slot`, or `None` at the end of a chain.
    pub fn next_of(&self, slot: usize) -> Option<usize> {
        match self.next[slot] {
            NIL => None,
            s => Some(s),
        }
    }

    /// Iterates over the action slots of `vehicle` in visiting order.
    pub fn chain(&self, vehicle: usize) -> Chain<'_> {
        Chain::new(&self.next, self.layout().start(vehicle))
    }

    /// Number of actions (pickups plus deliveries) on `vehicle`'s route.
    pub fn route_len(&self, vehicle: usize) -> usize {
        self.chain(vehicle).count()
    }

    /// Vehicle whose route contains `task`, if any.
    pub fn vehicle_of_task(&self, task: usize) -> Option<usize> {
        let target = self.layout().pickup(task);
        (0..self.num_vehicles()).find(|&v| self.chain(v).any(|s| s == target))
    }
}

/// Rewrites the chain starting at `start` so it visits `slots` in order.
pub(crate) fn relink(next: &mut [usize], start: usize, slots: &[usize]) {
    let mut prev = start;
    for &slot in slots {
        next[prev] = slot;
        prev = slot;
    }
    next[prev] = NIL;
}

/// Removes `slot` from its chain, given its predecessor.
pub(crate) fn detach(next: &mut [usize], prev: usize, slot: usize) {
    debug_assert_eq!(next[prev], slot);
    next[prev] = next[slot];
    next[slot] = NIL;
}

/// Inserts `slot` right after `prev`.
pub(crate) fn attach(next: &mut [usize], prev: usize, slot: usize) {
    next[slot] = next[prev];
    next[prev] = slot;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_points(d: f64) -> DistanceMatrix {
        DistanceMatrix::from_data(2, vec![0.0, d, d, 0.0]).expect("valid")
    }

    fn grid_instance() -> Arc<ProblemInstance> {
        let coords: Vec<(f64, f64)> = (0..6).map(|i| ((i % 3) as f64, (i / 3) as f64)).collect();
        let tasks = vec![
            Task::new(2, 0, 5),
            Task::new(3, 1, 4),
            Task::new(1, 2, 3),
            Task::new(4, 5, 0),
        ];
        let vehicles = vec![Vehicle::new(0, 5), Vehicle::new(3, 7).with_cost_per_distance(2.0)];
        Arc::new(
            ProblemInstance::new(tasks, vehicles, DistanceMatrix::from_coordinates(&coords))
                .expect("valid"),
        )
    }

    #[test]
    fn test_single_task_cost() {
        let sol = Solution::build(
            vec![Task::new(4, 0, 1)],
            vec![Vehicle::new(0, 10).with_cost_per_distance(5.0)],
            two_points(3.0),
            17,
        )
        .expect("feasible");
        assert!((sol.cost() - 15.0).abs() < 1e-10);
        assert_eq!(sol.chain(0).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_zero_tasks() {
        let sol = Solution::build(
            vec![],
            vec![Vehicle::new(0, 5), Vehicle::new(1, 5)],
            two_points(1.0),
            17,
        )
        .expect("feasible");
        assert_eq!(sol.cost(), 0.0);
        assert_eq!(sol.route_len(0), 0);
        assert_eq!(sol.route_len(1), 0);
        assert!(sol.validate().is_ok());
    }

    #[test]
    fn test_infeasible() {
        let err = Solution::build(
            vec![Task::new(6, 0, 1)],
            vec![Vehicle::new(0, 5)],
            two_points(1.0),
            17,
        )
        .unwrap_err();
        assert!(matches!(err, PdpError::Infeasible { .. }));
    }

    #[test]
    fn test_initial_is_valid_and_reproducible() {
        let inst = grid_instance();
        for seed in 0..20 {
            let a = Solution::initial(Arc::clone(&inst), seed);
            let b = Solution::initial(Arc::clone(&inst), seed);
            assert!(a.validate().is_ok(), "seed {seed}: {:?}", a.validate());
            assert_eq!(a.successors(), b.successors());
            assert!((a.cost() - a.compute_cost()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_initial_pairs_are_adjacent() {
        let inst = grid_instance();
        let sol = Solution::initial(Arc::clone(&inst), 3);
        let layout = sol.layout();
        for t in 0..sol.num_tasks() {
            assert_eq!(sol.next_of(layout.pickup(t)), Some(layout.delivery(t)));
        }
    }

    #[test]
    fn test_heavy_task_goes_to_large_vehicle() {
        // Task weighing 6 only fits vehicle 1 (capacity 7).
        let inst = Arc::new(
            ProblemInstance::new(
                vec![Task::new(6, 0, 1), Task::new(1, 1, 0)],
                vec![Vehicle::new(0, 5), Vehicle::new(0, 7)],
                two_points(1.0),
            )
            .expect("valid"),
        );
        for seed in 0..10 {
            let sol = Solution::initial(Arc::clone(&inst), seed);
            assert_eq!(sol.vehicle_of_task(0), Some(1));
        }
    }

    #[test]
    fn test_edit_recomputes_cost() {
        let inst = grid_instance();
        let sol = Solution::from_routes(Arc::clone(&inst), &[vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
        let before = sol.cost();
        let moved = sol.edit(|next| {
            detach(next, 1, 2);
            detach(next, 1, 3);
            attach(next, inst.layout().start(1), 3);
            attach(next, inst.layout().start(1), 2);
        });
        assert!(moved.validate().is_ok());
        assert_eq!(moved.chain(1).collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 7]);
        assert!((moved.cost() - moved.compute_cost()).abs() < 1e-9);
        // The original is untouched.
        assert_eq!(sol.chain(0).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!((sol.cost() - before).abs() < 1e-12);
    }

    #[test]
    fn test_cost_uses_vehicle_rate() {
        let inst = grid_instance();
        let sol = Solution::from_routes(Arc::clone(&inst), &[vec![], vec![0, 1]]);
        // Vehicle 1 at (0,1): -> (0,0) = 1, -> (2,1) = sqrt(5); rate 2.0
        let expected = 2.0 * (1.0 + 5.0_f64.sqrt());
        assert!((sol.cost() - expected).abs() < 1e-9);
        assert_eq!(sol.vehicle_of_task(0), Some(1));
        assert_eq!(sol.vehicle_of_task(1), None);
    }
}
