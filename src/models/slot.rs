//! Slot addressing for the flat action space.
//!
//! Task `t` owns pickup slot `2t` and delivery slot `2t + 1`; vehicle `v`
//! owns start slot `2T + v`. Chains are linked through these indices.

/// Successor value marking the end of a chain.
pub const NIL: usize = usize::MAX;

/// Index arithmetic for a problem with `T` tasks and `V` vehicles.
///
/// # Examples
///
/// ```
/// use u_pdp::models::SlotLayout;
///
/// let layout = SlotLayout::new(3, 2);
/// assert_eq!(layout.len(), 8);
/// assert_eq!(layout.pickup(1), 2);
/// assert_eq!(layout.delivery(1), 3);
/// assert_eq!(layout.start(1), 7);
/// assert_eq!(layout.partner(3), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    num_tasks: usize,
    num_vehicles: usize,
}

impl SlotLayout {
    /// Creates the layout for `num_tasks` tasks and `num_vehicles` vehicles.
    pub fn new(num_tasks: usize, num_vehicles: usize) -> Self {
        Self {
            num_tasks,
            num_vehicles,
        }
    }

    /// Number of tasks.
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Number of action slots (pickups and deliveries).
    pub fn num_actions(&self) -> usize {
        2 * self.num_tasks
    }

    /// Total number of slots, start slots included.
    pub fn len(&self) -> usize {
        self.num_actions() + self.num_vehicles
    }

    /// Returns `true` if there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pickup slot of `task`.
    pub fn pickup(&self, task: usize) -> usize {
        2 * task
    }

    /// Delivery slot of `task`.
    pub fn delivery(&self, task: usize) -> usize {
        2 * task + 1
    }

    /// Start slot of `vehicle`.
    pub fn start(&self, vehicle: usize) -> usize {
        self.num_actions() + vehicle
    }

    /// Returns `true` if `slot` is a vehicle start slot.
    pub fn is_start(&self, slot: usize) -> bool {
        slot >= self.num_actions() && slot < self.len()
    }

    /// Returns `true` if `slot` is a pickup slot.
    pub fn is_pickup(&self, slot: usize) -> bool {
        slot < self.num_actions() && slot % 2 == 0
    }

    /// Returns `true` if `slot` is a delivery slot.
    pub fn is_delivery(&self, slot: usize) -> bool {
        slot < self.num_actions() && slot % 2 == 1
    }

    /// Task owning an action slot.
    pub fn task_of(&self, slot: usize) -> usize {
        debug_assert!(slot < self.num_actions());
        slot / 2
    }

    /// The other half of an action's pickup/delivery pair.
    pub fn partner(&self, slot: usize) -> usize {
        debug_assert!(slot < self.num_actions());
        slot ^ 1
    }

    /// Vehicle owning a start slot.
    pub fn vehicle_of_start(&self, slot: usize) -> usize {
        debug_assert!(self.is_start(slot));
        slot - self.num_actions()
    }
}
