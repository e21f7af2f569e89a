//! Vehicle type with capacity and cost parameters.

use serde::{Deserialize, Serialize};

use super::Location;

/// A vehicle that starts at its home location and serves a chain of
/// pickups and deliveries.
///
/// Vehicles are identified by their index in the problem instance.
///
/// # Examples
///
/// ```
/// use u_pdp::models::Vehicle;
///
/// let v = Vehicle::new(0, 200).with_cost_per_distance(5.0);
/// assert_eq!(v.home(), 0);
/// assert_eq!(v.capacity(), 200);
/// assert_eq!(v.cost_per_distance(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    home: Location,
    capacity: i32,
    cost_per_distance: f64,
}

impl Vehicle {
    /// Creates a vehicle with the given home location and capacity.
    ///
    /// Default: cost_per_distance = 1.0.
    pub fn new(home: Location, capacity: i32) -> Self {
        Self {
            home,
            capacity,
            cost_per_distance: 1.0,
        }
    }

    /// Sets cost per unit distance.
    pub fn with_cost_per_distance(mut self, cost: f64) -> Self {
        self.cost_per_distance = cost;
        self
    }

    /// Location where the route starts.
    pub fn home(&self) -> Location {
        self.home
    }

    /// Maximum load carried at any point of the route.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Cost per unit distance traveled.
    pub fn cost_per_distance(&self) -> f64 {
        self.cost_per_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new(3, 100);
        assert_eq!(v.home(), 3);
        assert_eq!(v.capacity(), 100);
        assert_eq!(v.cost_per_distance(), 1.0);
    }

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new(1, 30).with_cost_per_distance(2.5);
        assert_eq!(v.home(), 1);
        assert_eq!(v.capacity(), 30);
        assert_eq!(v.cost_per_distance(), 2.5);
    }
}
