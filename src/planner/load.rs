//! Capacity- and constraint-aware trip loading.

use tracing::debug;

use crate::clock::DayContext;
use crate::error::StoreError;
use crate::models::Vehicle;
use crate::planner::PendingQueue;
use crate::store::{DependencyIndex, ParcelStore};

/// Selects which pending parcels board a vehicle for one trip.
///
/// Candidates pop from the queue in deadline-priority order and are checked
/// in a fixed precedence: a vehicle restriction defers the parcel on any
/// other vehicle; a delayed or misaddressed parcel defers until the
/// vehicle's clock reaches its availability; a ship-together group boards
/// atomically or defers whole; anything else boards immediately. Deferred
/// parcels return to the front of the queue at cycle end.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::clock::DayContext;
/// use parcel_dispatch::models::{Deadline, Parcel, Vehicle};
/// use parcel_dispatch::planner::{LoadPlanner, PendingQueue};
/// use parcel_dispatch::store::{DependencyIndex, ParcelStore};
///
/// let mut store = ParcelStore::with_capacity(4);
/// store
///     .insert(Parcel::new(1, 2, 3.5, Deadline::EndOfDay))
///     .expect("free slot");
/// let deps = DependencyIndex::build(&store).expect("resolvable");
/// let ctx = DayContext::new(NaiveTime::from_hms_opt(8, 0, 0).expect("valid"));
///
/// let mut vehicle = Vehicle::new(1, 16);
/// let mut queue = PendingQueue::from_store(&store);
/// let loaded = LoadPlanner::new()
///     .load_cycle(&mut vehicle, &mut queue, &mut store, &deps, &ctx)
///     .expect("store consistent");
/// assert_eq!(loaded, 1);
/// assert_eq!(vehicle.loaded(), &[1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoadPlanner {
    cycle_cap: Option<usize>,
}

impl LoadPlanner {
    /// Creates a planner bounded only by vehicle capacity.
    pub fn new() -> Self {
        Self { cycle_cap: None }
    }

    /// Additionally caps how many parcels one cycle may load.
    pub fn with_cycle_cap(mut self, cap: usize) -> Self {
        self.cycle_cap = Some(cap);
        self
    }

    /// Runs one load cycle for a vehicle, returning how many parcels
    /// boarded.
    ///
    /// Every boarded parcel is stamped with the vehicle's current clock
    /// and moved onto the vehicle; group co-members are pulled out of the
    /// queue along with the popped candidate. Constraints defer, they
    /// never fail.
    pub fn load_cycle(
        &self,
        vehicle: &mut Vehicle,
        queue: &mut PendingQueue,
        store: &mut ParcelStore,
        deps: &DependencyIndex,
        ctx: &DayContext,
    ) -> Result<usize, StoreError> {
        let clock = vehicle.current_time(ctx);
        let mut boarded = 0;

        while vehicle.has_room() && self.cycle_room(boarded) > 0 {
            let Some(id) = queue.pop() else {
                break;
            };
            let parcel = store.search(id)?;

            if let Some(required) = parcel.restricted_to() {
                if required != vehicle.id() {
                    debug!(
                        "parcel {} restricted to vehicle {}, deferred from vehicle {}",
                        id,
                        required,
                        vehicle.id()
                    );
                    queue.defer(id);
                    continue;
                }
            }

            if let Some(available_at) = parcel.available_at() {
                if clock < available_at {
                    debug!(
                        "parcel {} unavailable until {}, vehicle {} clock is {}",
                        id,
                        available_at,
                        vehicle.id(),
                        clock
                    );
                    queue.defer(id);
                    continue;
                }
            }

            // Membership comes from the symmetric index, not the parcel's
            // own annotation: a partner named by another parcel is grouped
            // even when its own notes say nothing.
            if deps.is_grouped(id) {
                let group = deps.discover_group(id);
                let room = vehicle.remaining_capacity().min(self.cycle_room(boarded));
                if group.len() > room {
                    debug!(
                        "group of {} around parcel {} exceeds room {}, deferred whole",
                        group.len(),
                        id,
                        room
                    );
                    queue.defer(id);
                    continue;
                }
                for member in group {
                    if member != id {
                        queue.remove(member);
                    }
                    store.search_mut(member)?.record_load(clock);
                    vehicle.load(member);
                    boarded += 1;
                }
                continue;
            }

            store.search_mut(id)?.record_load(clock);
            vehicle.load(id);
            boarded += 1;
        }

        queue.restore_deferred();
        debug!(
            "vehicle {} boarded {} parcels at {}",
            vehicle.id(),
            boarded,
            clock
        );
        Ok(boarded)
    }

    fn cycle_room(&self, boarded: usize) -> usize {
        self.cycle_cap
            .map_or(usize::MAX, |cap| cap.saturating_sub(boarded))
    }
}
