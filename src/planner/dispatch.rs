//! Fleet dispatch loop.

use serde::Serialize;
use tracing::{info, warn};

use crate::clock::DayContext;
use crate::error::DispatchError;
use crate::graph::LocationGraph;
use crate::models::Vehicle;
use crate::planner::{run_route, LoadPlanner, PendingQueue};
use crate::store::{DependencyIndex, ParcelStore};

/// Miles driven by one vehicle over the whole day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    /// Vehicle id.
    pub vehicle: usize,
    /// Accumulated miles including every return to the depot.
    pub miles: f64,
}

/// Fleet-wide dispatch result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSummary {
    /// Per-vehicle mileage in fleet order.
    pub vehicles: Vec<VehicleSummary>,
    /// Total miles across the fleet.
    pub total_miles: f64,
}

/// Runs the fleet against the pending queue until every parcel is assigned.
///
/// Single-threaded by design: each vehicle completes a full load-and-deliver
/// cycle before the next vehicle begins, so store, queue, and graph are
/// touched by one actor at a time.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::clock::DayContext;
/// use parcel_dispatch::graph::LocationGraph;
/// use parcel_dispatch::models::{Deadline, Location, Parcel, Vehicle};
/// use parcel_dispatch::planner::Dispatcher;
/// use parcel_dispatch::store::{DependencyIndex, ParcelStore};
///
/// let graph = LocationGraph::new(vec![
///     Location::new("Hub", "h", "0", vec![]),
///     Location::new("A", "a", "1", vec![5.0]),
///     Location::new("B", "b", "2", vec![3.0, 4.0]),
/// ])
/// .expect("triangular rows");
///
/// let mut store = ParcelStore::with_capacity(8);
/// store.insert(Parcel::new(1, 1, 1.0, Deadline::EndOfDay)).expect("free slot");
/// store.insert(Parcel::new(2, 2, 1.0, Deadline::EndOfDay)).expect("free slot");
/// let deps = DependencyIndex::build(&store).expect("resolvable");
///
/// let ctx = DayContext::new(NaiveTime::from_hms_opt(8, 0, 0).expect("valid"));
/// let mut fleet = vec![Vehicle::new(1, 16)];
///
/// let summary = Dispatcher::new(&graph, ctx)
///     .run(&mut fleet, &mut store, &deps)
///     .expect("satisfiable manifest");
/// assert_eq!(summary.total_miles, 12.0);
/// ```
#[derive(Debug)]
pub struct Dispatcher<'a> {
    graph: &'a LocationGraph,
    ctx: DayContext,
    loader: LoadPlanner,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over the given graph and day context.
    pub fn new(graph: &'a LocationGraph, ctx: DayContext) -> Self {
        Self {
            graph,
            ctx,
            loader: LoadPlanner::new(),
        }
    }

    /// Replaces the default load planner.
    pub fn with_loader(mut self, loader: LoadPlanner) -> Self {
        self.loader = loader;
        self
    }

    /// Dispatches the fleet until the pending queue drains.
    ///
    /// Fails up front with [`DispatchError::UnsatisfiableGroup`] if any
    /// ship-together closure is larger than every vehicle, and with
    /// [`DispatchError::Stalled`] if a full fleet pass can load nothing
    /// while parcels remain — both instead of looping forever.
    pub fn run(
        &self,
        fleet: &mut [Vehicle],
        store: &mut ParcelStore,
        deps: &DependencyIndex,
    ) -> Result<DispatchSummary, DispatchError> {
        let max_capacity = fleet.iter().map(Vehicle::capacity).max().unwrap_or(0);
        for group in deps.groups() {
            if group.len() > max_capacity {
                return Err(DispatchError::UnsatisfiableGroup {
                    parcel: group[0],
                    size: group.len(),
                    max_capacity,
                });
            }
        }

        let mut queue = PendingQueue::from_store(store);
        info!(
            "dispatching {} parcels across {} vehicles",
            queue.len(),
            fleet.len()
        );

        while !queue.is_empty() {
            let mut progressed = false;
            for vehicle in fleet.iter_mut() {
                if queue.is_empty() {
                    break;
                }
                let boarded =
                    self.loader
                        .load_cycle(vehicle, &mut queue, store, deps, &self.ctx)?;
                if boarded == 0 {
                    continue;
                }
                progressed = true;
                let trip_miles = run_route(vehicle, store, self.graph, &self.ctx)?;
                info!(
                    "vehicle {} delivered {} parcels over {:.1} miles",
                    vehicle.id(),
                    boarded,
                    trip_miles
                );
            }
            if !progressed {
                warn!("{} parcels can never load; stopping", queue.len());
                return Err(DispatchError::Stalled {
                    remaining: queue.len(),
                });
            }
        }

        let vehicles: Vec<VehicleSummary> = fleet
            .iter()
            .map(|v| VehicleSummary {
                vehicle: v.id(),
                miles: v.miles(),
            })
            .collect();
        let total_miles = vehicles.iter().map(|v| v.miles).sum();
        Ok(DispatchSummary {
            vehicles,
            total_miles,
        })
    }
}
