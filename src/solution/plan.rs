//! Extraction of per-vehicle action sequences.

use serde::{Deserialize, Serialize};

use crate::models::Location;

use super::Solution;

/// Whether an action loads or unloads a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Load the task at its origin.
    Pickup,
    /// Unload the task at its destination.
    Deliver,
}

/// A single pickup or delivery on a vehicle's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAction {
    /// Pickup or delivery.
    pub kind: ActionKind,
    /// Task index in the problem instance.
    pub task: usize,
    /// Where the action happens.
    pub location: Location,
}

/// The ordered actions of one vehicle.
///
/// Turning consecutive locations into concrete travel paths is left to the
/// caller; [`VehicleRoute::legs`] lists the location pairs to travel.
///
/// # Examples
///
/// ```
/// use u_pdp::distance::DistanceMatrix;
/// use u_pdp::models::{Task, Vehicle};
/// use u_pdp::solution::{ActionKind, Solution};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let sol = Solution::build(vec![Task::new(1, 1, 2)], vec![Vehicle::new(0, 5)], dm, 7).unwrap();
///
/// let routes = sol.to_routes();
/// assert_eq!(routes[0].actions[0].kind, ActionKind::Pickup);
/// assert_eq!(routes[0].legs(), vec![(0, 1), (1, 2)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    /// Vehicle index.
    pub vehicle: usize,
    /// Location the route starts from.
    pub home: Location,
    /// Actions in visiting order.
    pub actions: Vec<RouteAction>,
    /// Distance driven along the route.
    pub distance: f64,
    /// Distance times the vehicle's cost per distance.
    pub cost: f64,
}

impl VehicleRoute {
    /// Returns `true` if the vehicle stays home.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Consecutive `(from, to)` location pairs, starting from home.
    ///
    /// Pairs where both ends are the same location are kept so the list
    /// lines up with the actions.
    pub fn legs(&self) -> Vec<(Location, Location)> {
        let mut legs = Vec::with_capacity(self.actions.len());
        let mut from = self.home;
        for action in &self.actions {
            legs.push((from, action.location));
            from = action.location;
        }
        legs
    }

    /// Tasks picked up on this route, in pickup order.
    pub fn tasks(&self) -> Vec<usize> {
        self.actions
            .iter()
            .filter(|a| a.kind == ActionKind::Pickup)
            .map(|a| a.task)
            .collect()
    }
}

impl Solution {
    /// Renders every vehicle's chain as an ordered action list.
    pub fn to_routes(&self) -> Vec<VehicleRoute> {
        let instance = self.instance();
        let layout = self.layout();
        (0..self.num_vehicles())
            .map(|v| {
                let actions = self
                    .chain(v)
                    .map(|slot| RouteAction {
                        kind: if layout.is_pickup(slot) {
                            ActionKind::Pickup
                        } else {
                            ActionKind::Deliver
                        },
                        task: layout.task_of(slot),
                        location: instance.location(slot),
                    })
                    .collect();
                let distance = self.route_distance(v);
                VehicleRoute {
                    vehicle: v,
                    home: instance.vehicles()[v].home(),
                    actions,
                    distance,
                    cost: distance * instance.vehicles()[v].cost_per_distance(),
                }
            })
            .collect()
    }
}
