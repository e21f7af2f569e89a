//! Solution representation.
//!
//! - [`Solution`]: successor array over pickup, delivery and start slots
//! - [`RouteProfile`]: positional snapshot of one route with its loads
//! - [`VehicleRoute`]: ordered actions handed to callers
//! - [`InvariantViolation`]: what [`Solution::validate`] reports

mod chain;
mod pdp_solution;
mod plan;
mod validate;

pub use chain::{Chain, RouteProfile};
pub use pdp_solution::Solution;
pub use plan::{ActionKind, RouteAction, VehicleRoute};
pub use validate::InvariantViolation;

pub(crate) use pdp_solution::{attach, detach, relink};
