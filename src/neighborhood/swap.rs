//! Intra-vehicle pair swap.
//!
//! Exchanges the positions of two pickups on the same route and,
//! independently, the positions of their deliveries. Each task keeps its
//! pickup ahead of its delivery; the candidate is dropped when the new load
//! walk leaves `[0, capacity]`.

use rand::Rng;

use crate::solution::{relink, RouteProfile, Solution};

use super::reorder::pick_multi_task_route;

/// Generates at most one swap neighbor of `solution`.
pub fn swap_neighbors<R: Rng>(solution: &Solution, rng: &mut R) -> Vec<Solution> {
    let Some(profile) = pick_multi_task_route(solution, rng) else {
        return Vec::new();
    };
    let pairs = profile.num_pairs();
    let first = rng.random_range(0..pairs);
    let mut second = rng.random_range(0..pairs - 1);
    if second >= first {
        second += 1;
    }
    swap_pairs(solution, &profile, first, second)
        .into_iter()
        .collect()
}

/// Swaps the `first`-th and `second`-th pickups of `profile` along with
/// their deliveries.
pub(crate) fn swap_pairs(
    solution: &Solution,
    profile: &RouteProfile,
    first: usize,
    second: usize,
) -> Option<Solution> {
    let layout = solution.layout();
    let instance = solution.instance();
    let slots = profile.slots();

    let pa = profile.pickup_position(first)?;
    let pb = profile.pickup_position(second)?;
    let da = profile.position_of(layout.partner(slots[pa]))?;
    let db = profile.position_of(layout.partner(slots[pb]))?;

    let mut order = slots.to_vec();
    order.swap(pa, pb);
    order.swap(da, db);

    let mut load = 0;
    for &slot in &order {
        load += instance.weight_delta(slot);
        if !profile.fits(load) {
            return None;
        }
    }

    let start = profile.start();
    Some(solution.edit(|next| relink(next, start, &order)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{ProblemInstance, Task, Vehicle};

    fn instance(capacity: i32, weights: &[i32]) -> Arc<ProblemInstance> {
        let coords = [(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)];
        let tasks = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Task::new(w, i % 4, (i + 1) % 4))
            .collect();
        Arc::new(
            ProblemInstance::new(
                tasks,
                vec![Vehicle::new(0, capacity), Vehicle::new(2, capacity)],
                DistanceMatrix::from_coordinates(&coords),
            )
            .expect("valid"),
        )
    }

    #[test]
    fn test_swap_sequential_pairs() {
        let inst = instance(10, &[2, 3]);
        let sol = Solution::from_routes(Arc::clone(&inst), &[vec![0, 1, 2, 3], vec![]]);
        let profile = RouteProfile::new(&sol, 0);

        let n = swap_pairs(&sol, &profile, 0, 1).expect("feasible");
        assert_eq!(n.chain(0).collect::<Vec<_>>(), vec![2, 3, 0, 1]);
        assert!(n.validate().is_ok());
    }

    #[test]
    fn test_swap_interleaved_pairs() {
        let inst = instance(10, &[2, 3]);
        let sol = Solution::from_routes(Arc::clone(&inst), &[vec![0, 2, 3, 1], vec![]]);
        let profile = RouteProfile::new(&sol, 0);

        let n = swap_pairs(&sol, &profile, 0, 1).expect("feasible");
        assert_eq!(n.chain(0).collect::<Vec<_>>(), vec![2, 0, 1, 3]);
        assert!(n.validate().is_ok());
    }

    #[test]
    fn test_swap_rejected_over_capacity() {
        // Task 2 sits inside task 0; after the swap it sits inside task 1.
        let inst = instance(6, &[2, 4, 3]);
        let sol = Solution::from_routes(Arc::clone(&inst), &[vec![0, 4, 5, 1, 2, 3], vec![]]);
        let profile = RouteProfile::new(&sol, 0);

        // Swap task 0 and task 1: [2, 4, 5, 3, 0, 1] carries 4 + 3 = 7.
        assert!(swap_pairs(&sol, &profile, 0, 2).is_none());
    }

    #[test]
    fn test_random_swaps_are_valid() {
        let inst = instance(7, &[1, 2, 3, 4, 2]);
        let sol = Solution::initial(Arc::clone(&inst), 9);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let neighbors = swap_neighbors(&sol, &mut rng);
            assert!(neighbors.len() <= 1);
            for n in neighbors {
                assert!(n.validate().is_ok());
            }
        }
    }
}
