//! # u-pdp
//!
//! Time-boxed local search for the capacitated multi-vehicle
//! pickup-and-delivery problem. Every task is picked up at its origin and
//! delivered to its destination by one vehicle, loads never exceed vehicle
//! capacity, and the search returns the best feasible plan found before a
//! wall-clock deadline.
//!
//! ## Modules
//!
//! - [`models`]: Tasks, vehicles, the validated problem instance and its slot layout
//! - [`distance`]: Distance matrix
//! - [`solution`]: Successor-array solution, invariant checks, route extraction
//! - [`neighborhood`]: Feasible move families (reassign, reorder, swap)
//! - [`search`]: Deadline-bounded search with pluggable acceptance policies
//! - [`planner`]: Fleet planning and marginal-cost pricing
//! - [`error`]: Error types

pub mod distance;
pub mod error;
pub mod models;
pub mod neighborhood;
pub mod planner;
pub mod search;
pub mod solution;

pub use error::PdpError;
