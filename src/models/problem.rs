//! Validated problem instance.

use std::sync::Arc;

use crate::distance::DistanceMatrix;
use crate::error::PdpError;

use super::{Location, SlotLayout, Task, Vehicle};

/// An immutable pickup-and-delivery problem: tasks, vehicles and the
/// distances between their locations.
///
/// Besides the input data, the instance precomputes per-slot lookup tables
/// (load delta and location) so solutions can walk their chains without
/// touching the task and vehicle lists.
///
/// # Examples
///
/// ```
/// use u_pdp::distance::DistanceMatrix;
/// use u_pdp::models::{ProblemInstance, Task, Vehicle};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0)]);
/// let problem = ProblemInstance::new(
///     vec![Task::new(4, 0, 1)],
///     vec![Vehicle::new(0, 10)],
///     dm,
/// )
/// .unwrap();
/// assert_eq!(problem.num_tasks(), 1);
/// assert_eq!(problem.weight_delta(problem.layout().delivery(0)), -4);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    tasks: Vec<Task>,
    vehicles: Vec<Vehicle>,
    distances: Arc<DistanceMatrix>,
    layout: SlotLayout,
    deltas: Vec<i32>,
    locations: Vec<Location>,
}

impl ProblemInstance {
    /// Validates the input and builds the instance.
    ///
    /// # Errors
    ///
    /// - [`PdpError::InvalidTask`] for a non-positive weight or a location
    ///   outside the distance matrix.
    /// - [`PdpError::InvalidVehicle`] for a non-positive capacity, a negative
    ///   or non-finite cost, or a home outside the distance matrix.
    /// - [`PdpError::Infeasible`] if a task is heavier than every vehicle's
    ///   capacity.
    /// - [`PdpError::InvalidDistance`] for a negative or non-finite distance.
    pub fn new(
        tasks: Vec<Task>,
        vehicles: Vec<Vehicle>,
        distances: DistanceMatrix,
    ) -> Result<Self, PdpError> {
        Self::with_shared_distances(tasks, vehicles, Arc::new(distances))
    }

    /// Same as [`ProblemInstance::new`], reusing a distance matrix shared
    /// with other instances instead of taking ownership of a copy.
    pub fn with_shared_distances(
        tasks: Vec<Task>,
        vehicles: Vec<Vehicle>,
        distances: Arc<DistanceMatrix>,
    ) -> Result<Self, PdpError> {
        let n = distances.size();

        if let Some((from, to, value)) = distances.first_invalid() {
            return Err(PdpError::InvalidDistance { from, to, value });
        }

        for (i, v) in vehicles.iter().enumerate() {
            if v.capacity() <= 0 {
                return Err(PdpError::InvalidVehicle {
                    vehicle: i,
                    reason: format!("capacity must be positive, got {}", v.capacity()),
                });
            }
            if !v.cost_per_distance().is_finite() || v.cost_per_distance() < 0.0 {
                return Err(PdpError::InvalidVehicle {
                    vehicle: i,
                    reason: format!(
                        "cost per distance must be finite and non-negative, got {}",
                        v.cost_per_distance()
                    ),
                });
            }
            if v.home() >= n {
                return Err(PdpError::InvalidVehicle {
                    vehicle: i,
                    reason: format!("home location {} outside distance matrix", v.home()),
                });
            }
        }

        let max_capacity = vehicles.iter().map(Vehicle::capacity).max().unwrap_or(0);

        for (i, t) in tasks.iter().enumerate() {
            if t.weight() <= 0 {
                return Err(PdpError::InvalidTask {
                    task: i,
                    reason: format!("weight must be positive, got {}", t.weight()),
                });
            }
            if t.origin() >= n || t.destination() >= n {
                return Err(PdpError::InvalidTask {
                    task: i,
                    reason: format!(
                        "locations {}->{} outside distance matrix",
                        t.origin(),
                        t.destination()
                    ),
                });
            }
            if t.weight() > max_capacity {
                return Err(PdpError::Infeasible {
                    task: i,
                    weight: t.weight(),
                    max_capacity,
                });
            }
        }

        let layout = SlotLayout::new(tasks.len(), vehicles.len());
        let mut deltas = Vec::with_capacity(layout.num_actions());
        let mut locations = Vec::with_capacity(layout.len());
        for t in &tasks {
            deltas.push(t.weight());
            deltas.push(-t.weight());
            locations.push(t.origin());
            locations.push(t.destination());
        }
        locations.extend(vehicles.iter().map(Vehicle::home));

        Ok(Self {
            tasks,
            vehicles,
            distances,
            layout,
            deltas,
            locations,
        })
    }

    /// Returns the tasks.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Returns the distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Returns the shared handle to the distance matrix.
    pub fn shared_distances(&self) -> &Arc<DistanceMatrix> {
        &self.distances
    }

    /// Number of tasks.
    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Slot addressing for this instance.
    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    /// Largest vehicle capacity (0 for an empty fleet).
    pub fn max_capacity(&self) -> i32 {
        self.vehicles.iter().map(Vehicle::capacity).max().unwrap_or(0)
    }

    /// Load change of an action slot: `+weight` for a pickup, `-weight` for
    /// a delivery.
    pub fn weight_delta(&self, slot: usize) -> i32 {
        self.deltas[slot]
    }

    /// Location of any slot (start slots map to the vehicle's home).
    pub fn location(&self, slot: usize) -> Location {
        self.locations[slot]
    }

    /// Distance between the locations of two slots.
    pub fn slot_distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(self.locations[from], self.locations[to])
    }
}
