//! Pickup-and-delivery task type.

use serde::{Deserialize, Serialize};

/// Index of a location in the [`DistanceMatrix`](crate::distance::DistanceMatrix).
pub type Location = usize;

/// A load to be picked up at `origin` and delivered at `destination`.
///
/// A task splits into two actions: a pickup that adds `weight` to the
/// vehicle's load and a delivery that removes it again.
///
/// # Examples
///
/// ```
/// use u_pdp::models::Task;
///
/// let t = Task::new(4, 0, 1);
/// assert_eq!(t.weight(), 4);
/// assert_eq!(t.origin(), 0);
/// assert_eq!(t.destination(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    weight: i32,
    origin: Location,
    destination: Location,
}

impl Task {
    /// Creates a task. Validation happens when the task enters a
    /// [`ProblemInstance`](super::ProblemInstance).
    pub fn new(weight: i32, origin: Location, destination: Location) -> Self {
        Self {
            weight,
            origin,
            destination,
        }
    }

    /// Load carried between pickup and delivery.
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Pickup location.
    pub fn origin(&self) -> Location {
        self.origin
    }

    /// Delivery location.
    pub fn destination(&self) -> Location {
        self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_accessors() {
        let t = Task::new(7, 3, 5);
        assert_eq!(t.weight(), 7);
        assert_eq!(t.origin(), 3);
        assert_eq!(t.destination(), 5);
    }

    #[test]
    fn test_task_serde() {
        let t = Task::new(2, 0, 4);
        let json = serde_json::to_string(&t).expect("serialize");
        let back: Task = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, t);
    }
}
