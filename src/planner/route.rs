//! Nearest-stop delivery routing.

use tracing::debug;

use crate::clock::DayContext;
use crate::error::StoreError;
use crate::graph::{LocationGraph, DEPOT};
use crate::models::Vehicle;
use crate::store::ParcelStore;

/// Drives one loaded vehicle until every parcel on board is delivered,
/// then returns it to the depot. Returns the miles driven on this trip.
///
/// Greedy nearest-neighbor over repeated shortest paths: each iteration
/// recomputes the shortest-path distance from the vehicle's current
/// location to every remaining stop, advances to the globally nearest one
/// (ties go to the stop that became eligible first), and stamps delivery on
/// every parcel addressed there with the vehicle's clock. Not an optimal
/// route; deadline-priority loading makes tight-deadline stops tend to come
/// up early.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::clock::DayContext;
/// use parcel_dispatch::graph::LocationGraph;
/// use parcel_dispatch::models::{Deadline, Location, Parcel, Vehicle};
/// use parcel_dispatch::planner::run_route;
/// use parcel_dispatch::store::ParcelStore;
///
/// let graph = LocationGraph::new(vec![
///     Location::new("Hub", "h", "0", vec![]),
///     Location::new("A", "a", "1", vec![5.0]),
/// ])
/// .expect("triangular rows");
/// let ctx = DayContext::new(NaiveTime::from_hms_opt(8, 0, 0).expect("valid"));
///
/// let mut store = ParcelStore::with_capacity(4);
/// let mut parcel = Parcel::new(1, 1, 2.0, Deadline::EndOfDay);
/// parcel.record_load(ctx.day_start());
/// store.insert(parcel).expect("free slot");
///
/// let mut vehicle = Vehicle::new(1, 16);
/// vehicle.load(1);
/// let miles = run_route(&mut vehicle, &mut store, &graph, &ctx).expect("consistent");
/// assert_eq!(miles, 10.0); // out and back
/// assert_eq!(vehicle.location(), 0);
/// ```
pub fn run_route(
    vehicle: &mut Vehicle,
    store: &mut ParcelStore,
    graph: &LocationGraph,
    ctx: &DayContext,
) -> Result<f64, StoreError> {
    // Remaining stops in the order they first became eligible (load order).
    let mut stops: Vec<usize> = Vec::new();
    for &id in vehicle.loaded() {
        let destination = store.search(id)?.destination();
        if !stops.contains(&destination) {
            stops.push(destination);
        }
    }
    let start_miles = vehicle.miles();

    while !stops.is_empty() {
        let mut nearest: Option<(usize, f64)> = None;
        for (position, &stop) in stops.iter().enumerate() {
            let distance = graph.shortest_distance(vehicle.location(), stop);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((position, distance));
            }
        }
        let Some((position, distance)) = nearest else {
            break;
        };
        let stop = stops.remove(position);
        vehicle.drive_to(stop, distance);
        let now = vehicle.current_time(ctx);

        let on_board: Vec<u32> = vehicle.loaded().to_vec();
        for id in on_board {
            let parcel = store.search_mut(id)?;
            if parcel.destination() == stop {
                parcel.record_delivery(now);
                vehicle.unload(id);
                debug!("vehicle {} delivered parcel {} at {}", vehicle.id(), id, now);
            }
        }
    }

    // Final leg back to the depot, delivering nothing.
    let home = graph.shortest_distance(vehicle.location(), DEPOT);
    vehicle.drive_to(DEPOT, home);

    Ok(vehicle.miles() - start_miles)
}
