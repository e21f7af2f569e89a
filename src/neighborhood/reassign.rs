//! Cross-vehicle pair reassignment.
//!
//! # Algorithm
//!
//! Picks a random vehicle with at least one task and a random pickup on its
//! route. For every other vehicle that can carry the task, emits a neighbor
//! where the pickup/delivery pair is removed from the source route and
//! reinserted as the first two actions of the target route.
//!
//! Inserting the pair at the front, delivery right after pickup, is what
//! makes the target's declared capacity a sufficient feasibility check:
//! the target carries nothing else while the pair is on board.

use rand::Rng;

use crate::solution::{attach, detach, RouteProfile, Solution};

/// Generates reassignment neighbors of `solution`.
///
/// Returns an empty list when no vehicle has a task or the fleet has a
/// single vehicle.
pub fn reassign_neighbors<R: Rng>(solution: &Solution, rng: &mut R) -> Vec<Solution> {
    let layout = solution.layout();
    let loaded: Vec<usize> = (0..solution.num_vehicles())
        .filter(|&v| solution.next_of(layout.start(v)).is_some())
        .collect();
    if loaded.is_empty() || solution.num_vehicles() < 2 {
        return Vec::new();
    }

    let vehicle = loaded[rng.random_range(0..loaded.len())];
    let profile = RouteProfile::new(solution, vehicle);
    let offset = rng.random_range(0..profile.num_pairs());
    match profile.pickup_position(offset) {
        Some(pos) => reassign_pair(solution, &profile, pos),
        None => Vec::new(),
    }
}

/// Moves the pair whose pickup sits at `pickup_pos` of `profile` to the
/// front of every other vehicle able to carry it.
pub(crate) fn reassign_pair(
    solution: &Solution,
    profile: &RouteProfile,
    pickup_pos: usize,
) -> Vec<Solution> {
    let instance = solution.instance();
    let layout = solution.layout();
    let pickup = profile.slots()[pickup_pos];
    let delivery = layout.partner(pickup);
    let Some(delivery_pos) = profile.position_of(delivery) else {
        return Vec::new();
    };
    let weight = instance.weight_delta(pickup);
    let before_pickup = profile.predecessor(pickup_pos);
    let before_delivery = profile.predecessor(delivery_pos);

    (0..solution.num_vehicles())
        .filter(|&v| v != profile.vehicle() && instance.vehicles()[v].capacity() >= weight)
        .map(|target| {
            let head = layout.start(target);
            solution.edit(|next| {
                // Delivery first: its predecessor may be the pickup itself.
                detach(next, before_delivery, delivery);
                detach(next, before_pickup, pickup);
                attach(next, head, delivery);
                attach(next, head, pickup);
            })
        })
        .collect()
}
