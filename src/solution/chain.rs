//! Chain traversal and load profiles.

use crate::models::NIL;

use super::Solution;

/// Iterator over the action slots of one vehicle's chain.
///
/// Yields at most as many slots as the successor array holds, so a corrupt
/// cyclic chain cannot hang the caller.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: &'a [usize],
    current: usize,
    remaining: usize,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(next: &'a [usize], start: usize) -> Self {
        Self {
            next,
            current: start,
            remaining: next.len(),
        }
    }
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        match self.next[self.current] {
            NIL => None,
            slot => {
                self.current = slot;
                self.remaining -= 1;
                Some(slot)
            }
        }
    }
}

/// Snapshot of one vehicle's route as positions: the slot visited at each
/// step and the load carried right after it.
///
/// Neighborhood moves read positions from the profile and splice the
/// successor array through them.
#[derive(Debug, Clone)]
pub struct RouteProfile {
    vehicle: usize,
    start: usize,
    capacity: i32,
    slots: Vec<usize>,
    loads: Vec<i32>,
}

impl RouteProfile {
    /// Walks `vehicle`'s chain in `solution`.
    pub fn new(solution: &Solution, vehicle: usize) -> Self {
        let instance = solution.instance();
        let slots: Vec<usize> = solution.chain(vehicle).collect();
        let mut loads = Vec::with_capacity(slots.len());
        let mut load = 0;
        for &slot in &slots {
            load += instance.weight_delta(slot);
            loads.push(load);
        }
        Self {
            vehicle,
            start: solution.layout().start(vehicle),
            capacity: instance.vehicles()[vehicle].capacity(),
            slots,
            loads,
        }
    }

    /// Vehicle this profile describes.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Start slot of the vehicle.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Slots in visiting order.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Load after each position.
    pub fn loads(&self) -> &[i32] {
        &self.loads
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the route is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of pickup/delivery pairs on the route.
    pub fn num_pairs(&self) -> usize {
        self.slots.len() / 2
    }

    /// Slot visited before position `pos` (the start slot for position 0).
    pub fn predecessor(&self, pos: usize) -> usize {
        if pos == 0 {
            self.start
        } else {
            self.slots[pos - 1]
        }
    }

    /// Position of the `offset`-th pickup (0-based) along the route.
    pub fn pickup_position(&self, offset: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s % 2 == 0)
            .nth(offset)
            .map(|(pos, _)| pos)
    }

    /// Position of `slot` along the route.
    pub fn position_of(&self, slot: usize) -> Option<usize> {
        self.slots.iter().position(|&s| s == slot)
    }

    /// Returns `true` if a load of `load` fits the vehicle.
    pub fn fits(&self, load: i32) -> bool {
        (0..=self.capacity).contains(&load)
    }
}
