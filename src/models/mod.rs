//! Domain model types for pickup-and-delivery problems.
//!
//! Tasks carry a load from an origin to a destination, vehicles carry
//! loads up to their capacity, and a [`ProblemInstance`] validates and
//! freezes both together with the distance matrix.

mod problem;
mod slot;
mod task;
mod vehicle;

pub use problem::ProblemInstance;
pub use slot::{SlotLayout, NIL};
pub use task::{Location, Task};
pub use vehicle::Vehicle;
