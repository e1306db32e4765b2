//! Vehicle type with speed, capacity, and a derived wall-clock.

use chrono::NaiveTime;

use crate::clock::DayContext;

/// A delivery vehicle.
///
/// Vehicle ids are 1-based so a `Can only be on truck 2` restriction
/// compares directly against [`Vehicle::id`]. The clock is derived, never
/// stored: day start, plus the dispatch delay, plus driving time for the
/// accumulated mileage, so it only moves forward as the vehicle drives.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::models::Vehicle;
///
/// let v = Vehicle::new(1, 16);
/// assert_eq!(v.id(), 1);
/// assert_eq!(v.capacity(), 16);
/// assert_eq!(v.speed_mph(), 18.0);
/// assert!(v.has_room());
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: usize,
    speed_mph: f64,
    capacity: usize,
    dispatch_delay_min: i64,
    miles: f64,
    location: usize,
    loaded: Vec<u32>,
}

impl Vehicle {
    /// Creates a vehicle with the given id and capacity.
    ///
    /// Default: 18 mph average speed, no dispatch delay, parked at the
    /// depot (location 0).
    pub fn new(id: usize, capacity: usize) -> Self {
        Self {
            id,
            speed_mph: 18.0,
            capacity,
            dispatch_delay_min: 0,
            miles: 0.0,
            location: 0,
            loaded: Vec::new(),
        }
    }

    /// Sets the average speed in miles per hour.
    pub fn with_speed(mut self, speed_mph: f64) -> Self {
        self.speed_mph = speed_mph;
        self
    }

    /// Holds the vehicle at the depot for the given minutes before its
    /// clock starts.
    pub fn with_dispatch_delay(mut self, minutes: i64) -> Self {
        self.dispatch_delay_min = minutes;
        self
    }

    /// Vehicle id (1-based).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Average speed in miles per hour.
    pub fn speed_mph(&self) -> f64 {
        self.speed_mph
    }

    /// Maximum concurrently loaded parcels.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Minutes held at the depot before the clock starts.
    pub fn dispatch_delay_min(&self) -> i64 {
        self.dispatch_delay_min
    }

    /// Accumulated miles driven.
    pub fn miles(&self) -> f64 {
        self.miles
    }

    /// Current location index.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Ids of the currently loaded, undelivered parcels in load order.
    pub fn loaded(&self) -> &[u32] {
        &self.loaded
    }

    /// Returns `true` if another parcel fits.
    pub fn has_room(&self) -> bool {
        self.loaded.len() < self.capacity
    }

    /// Slots left before the vehicle is full.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.loaded.len()
    }

    /// The vehicle's wall-clock at its current mileage.
    pub fn current_time(&self, ctx: &DayContext) -> NaiveTime {
        ctx.time_at(self.dispatch_delay_min, self.miles, self.speed_mph)
    }

    /// Puts a parcel on board.
    pub fn load(&mut self, parcel: u32) {
        debug_assert!(self.has_room());
        self.loaded.push(parcel);
    }

    /// Takes a delivered parcel off board. Returns `false` if it was not
    /// on board.
    pub fn unload(&mut self, parcel: u32) -> bool {
        match self.loaded.iter().position(|&id| id == parcel) {
            Some(pos) => {
                self.loaded.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drives to a location, accumulating the given miles.
    pub fn drive_to(&mut self, location: usize, miles: f64) {
        debug_assert!(miles >= 0.0);
        self.location = location;
        self.miles += miles;
    }
}
