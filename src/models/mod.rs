//! Domain model types for same-day parcel dispatch.
//!
//! Provides the core abstractions: locations identified by stable index,
//! parcels with deadlines and delivery constraints, and vehicles with
//! capacity, speed, and a derived wall-clock.

mod location;
mod parcel;
mod vehicle;

pub use location::Location;
pub use parcel::{Constraint, Deadline, Parcel, ParcelStatus};
pub use vehicle::Vehicle;
