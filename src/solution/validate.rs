//! Structural invariant checks.

use thiserror::Error;

use crate::models::NIL;

use super::Solution;

/// A broken structural invariant of a [`Solution`].
///
/// None of these is reachable through construction or neighborhood moves;
/// seeing one means a move produced a corrupt successor array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The successor array does not match the instance's slot count.
    #[error("successor array has {actual} entries, expected {expected}")]
    WrongLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A successor points outside the action slots.
    #[error("slot {slot} links to invalid slot {target}")]
    InvalidLink {
        /// Slot holding the bad link.
        slot: usize,
        /// The bad successor.
        target: usize,
    },
    /// A chain loops back on itself.
    #[error("chain of vehicle {vehicle} contains a cycle")]
    Cycle {
        /// Vehicle whose chain loops.
        vehicle: usize,
    },
    /// An action is reached more than once.
    #[error("slot {slot} is reached more than once")]
    Shared {
        /// Slot with two predecessors.
        slot: usize,
    },
    /// An action is not on any chain.
    #[error("slot {slot} is not on any route")]
    Unreachable {
        /// Orphaned slot.
        slot: usize,
    },
    /// A delivery precedes its pickup, or they sit on different vehicles.
    #[error("task {task} is not picked up before delivery on a single route")]
    Precedence {
        /// Offending task.
        task: usize,
    },
    /// The running load leaves `[0, capacity]`.
    #[error("vehicle {vehicle} carries {load} with capacity {capacity}")]
    Capacity {
        /// Overloaded vehicle.
        vehicle: usize,
        /// Load reached.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
}

impl Solution {
    /// Checks single ownership, pickup-before-delivery on one route,
    /// bounded load and acyclicity.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let instance = self.instance();
        let layout = self.layout();
        let next = self.successors();

        if next.len() != layout.len() {
            return Err(InvariantViolation::WrongLength {
                expected: layout.len(),
                actual: next.len(),
            });
        }

        // Route and position of every action slot.
        let mut owner: Vec<Option<(usize, usize)>> = vec![None; layout.num_actions()];

        for v in 0..layout.num_vehicles() {
            let capacity = instance.vehicles()[v].capacity();
            let mut current = layout.start(v);
            let mut load = 0;
            let mut steps = 0;
            while next[current] != NIL {
                let slot = next[current];
                if slot >= layout.num_actions() {
                    return Err(InvariantViolation::InvalidLink {
                        slot: current,
                        target: slot,
                    });
                }
                if steps >= layout.num_actions() {
                    return Err(InvariantViolation::Cycle { vehicle: v });
                }
                if owner[slot].is_some() {
                    return Err(InvariantViolation::Shared { slot });
                }
                owner[slot] = Some((v, steps));

                load += instance.weight_delta(slot);
                if !(0..=capacity).contains(&load) {
                    return Err(InvariantViolation::Capacity {
                        vehicle: v,
                        load,
                        capacity,
                    });
                }
                current = slot;
                steps += 1;
            }
        }

        for task in 0..layout.num_tasks() {
            let pickup = owner[layout.pickup(task)];
            let delivery = owner[layout.delivery(task)];
            match (pickup, delivery) {
                (Some((vp, pp)), Some((vd, pd))) => {
                    if vp != vd || pp >= pd {
                        return Err(InvariantViolation::Precedence { task });
                    }
                }
                (None, _) => {
                    return Err(InvariantViolation::Unreachable {
                        slot: layout.pickup(task),
                    })
                }
                (_, None) => {
                    return Err(InvariantViolation::Unreachable {
                        slot: layout.delivery(task),
                    })
                }
            }
        }

        Ok(())
    }
}
