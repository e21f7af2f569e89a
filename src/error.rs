//! Error types.

use thiserror::Error;

/// Errors raised while building a problem instance or configuring a search.
///
/// Runtime conditions inside the search loop (empty neighborhoods, the
/// deadline passing) are not errors; they end an iteration or the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PdpError {
    /// A task is heavier than every vehicle can carry, so no assignment exists.
    #[error("task {task} weighs {weight} but the largest vehicle capacity is {max_capacity}")]
    Infeasible {
        /// Index of the offending task.
        task: usize,
        /// Its weight.
        weight: i32,
        /// Largest capacity in the fleet (0 for an empty fleet).
        max_capacity: i32,
    },

    /// A task carries invalid data.
    #[error("invalid task {task}: {reason}")]
    InvalidTask {
        /// Index of the offending task.
        task: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A vehicle carries invalid data.
    #[error("invalid vehicle {vehicle}: {reason}")]
    InvalidVehicle {
        /// Index of the offending vehicle.
        vehicle: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A distance matrix entry is negative or not finite.
    #[error("invalid distance from {from} to {to}: {value}")]
    InvalidDistance {
        /// Row of the offending entry.
        from: usize,
        /// Column of the offending entry.
        to: usize,
        /// The entry itself.
        value: f64,
    },

    /// A search configuration parameter is out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
