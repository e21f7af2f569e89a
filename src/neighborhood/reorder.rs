//! Intra-vehicle pickup/delivery reordering.
//!
//! # Algorithm
//!
//! Picks a random vehicle with at least two tasks and a random pair on its
//! route, then slides one action of the pair, one position at a time, in
//! four directions:
//!
//! - pickup earlier, towards the start of the route
//! - pickup later, up to just before its delivery
//! - delivery earlier, down to just after its pickup
//! - delivery later, towards the end of the route
//!
//! Every position is a separate neighbor built from the original route.
//! Moving further in one direction only adds positions whose load changes,
//! so the first position where the load leaves `[0, capacity]` ends that
//! direction.

use rand::Rng;

use crate::solution::{attach, detach, RouteProfile, Solution};

/// Generates reorder neighbors of `solution`.
///
/// Returns an empty list when no vehicle carries two or more tasks.
pub fn reorder_neighbors<R: Rng>(solution: &Solution, rng: &mut R) -> Vec<Solution> {
    let Some(profile) = pick_multi_task_route(solution, rng) else {
        return Vec::new();
    };
    let offset = rng.random_range(0..profile.num_pairs());
    match profile.pickup_position(offset) {
        Some(pos) => reorder_pair(solution, &profile, pos),
        None => Vec::new(),
    }
}

/// Profile of a random vehicle whose route holds at least two pairs.
pub(crate) fn pick_multi_task_route<R: Rng>(
    solution: &Solution,
    rng: &mut R,
) -> Option<RouteProfile> {
    let eligible: Vec<usize> = (0..solution.num_vehicles())
        .filter(|&v| solution.chain(v).nth(3).is_some())
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let vehicle = eligible[rng.random_range(0..eligible.len())];
    Some(RouteProfile::new(solution, vehicle))
}

/// All feasible single-action shifts of the pair whose pickup sits at
/// position `p` of `profile`.
pub(crate) fn reorder_pair(solution: &Solution, profile: &RouteProfile, p: usize) -> Vec<Solution> {
    let layout = solution.layout();
    let slots = profile.slots();
    let loads = profile.loads();
    let pickup = slots[p];
    let delivery = layout.partner(pickup);
    let Some(d) = profile.position_of(delivery) else {
        return Vec::new();
    };
    let w = solution.instance().weight_delta(pickup);
    let before_pickup = profile.predecessor(p);
    let before_delivery = profile.predecessor(d);
    let mut neighbors = Vec::new();

    // Pickup earlier: carried from position i on, including the pickup itself.
    for i in (0..p).rev() {
        let before = if i == 0 { 0 } else { loads[i - 1] };
        if !profile.fits(before + w) || !profile.fits(loads[i] + w) {
            break;
        }
        let anchor = profile.predecessor(i);
        neighbors.push(solution.edit(|next| {
            detach(next, before_pickup, pickup);
            attach(next, anchor, pickup);
        }));
    }

    // Pickup later: not carried until after position i.
    for i in (p + 1)..d {
        if !profile.fits(loads[i] - w) {
            break;
        }
        let anchor = slots[i];
        neighbors.push(solution.edit(|next| {
            detach(next, before_pickup, pickup);
            attach(next, anchor, pickup);
        }));
    }

    // Delivery earlier: dropped before position i.
    for i in ((p + 1)..d).rev() {
        if !profile.fits(loads[i - 1] - w) || !profile.fits(loads[i] - w) {
            break;
        }
        let anchor = slots[i - 1];
        neighbors.push(solution.edit(|next| {
            detach(next, before_delivery, delivery);
            attach(next, anchor, delivery);
        }));
    }

    // Delivery later: still carried through position i.
    for i in (d + 1)..slots.len() {
        if !profile.fits(loads[i] + w) {
            break;
        }
        let anchor = slots[i];
        neighbors.push(solution.edit(|next| {
            detach(next, before_delivery, delivery);
            attach(next, anchor, delivery);
        }));
    }

    neighbors
}
