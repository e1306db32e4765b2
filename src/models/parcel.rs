//! Parcel, deadline, constraint, and status types.

use chrono::NaiveTime;
use serde::Serialize;

/// A delivery deadline.
///
/// Every timed deadline sorts before [`Deadline::EndOfDay`], and timed
/// deadlines sort by ascending time, which is exactly the priority order
/// the pending queue loads in.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::models::Deadline;
///
/// let morning = Deadline::At(NaiveTime::from_hms_opt(10, 30, 0).expect("valid"));
/// assert!(morning < Deadline::EndOfDay);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Deadline {
    /// Deliver no later than the given wall-clock time.
    At(NaiveTime),
    /// Deliver any time before the day ends.
    EndOfDay,
}

/// A per-parcel delivery constraint, produced once at parse time.
///
/// The load planner switches on this closed set instead of re-matching the
/// manifest's free-text annotation on every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// May only ride the vehicle with the given id.
    TruckOnly(usize),
    /// Not at the depot until `available_at` (late inbound flight).
    Delayed {
        /// Wall-clock time the parcel reaches the depot.
        available_at: NaiveTime,
    },
    /// Manifest address is wrong; the corrected address applies and the
    /// parcel may not load until the correction arrives.
    Misaddressed {
        /// Corrected street address.
        street: String,
        /// Corrected postal code.
        zip: String,
        /// Wall-clock time the correction is known.
        available_at: NaiveTime,
    },
    /// Must ride the same trip as every listed parcel.
    DeliverWith(Vec<u32>),
}

/// Where a parcel is at a queried point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Still at the depot.
    AtDepot,
    /// On a vehicle.
    EnRoute {
        /// When it was loaded.
        since: NaiveTime,
    },
    /// Delivered.
    Delivered {
        /// When it was delivered.
        at: NaiveTime,
    },
}

/// A parcel to be dispatched from the depot.
///
/// The store owns every parcel; vehicles reference loaded parcels by id.
/// The destination is a stable location index into the graph. Load and
/// delivery stamps start unset and are recorded by the planners; once both
/// are set, the load stamp never exceeds the delivery stamp.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::models::{Deadline, Parcel, ParcelStatus};
///
/// let mut p = Parcel::new(1, 2, 21.0, Deadline::EndOfDay);
/// let eight = NaiveTime::from_hms_opt(8, 0, 0).expect("valid");
/// assert_eq!(p.status_at(eight), ParcelStatus::AtDepot);
///
/// p.record_load(eight);
/// assert_eq!(p.status_at(eight), ParcelStatus::EnRoute { since: eight });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    id: u32,
    destination: usize,
    mass_kg: f64,
    deadline: Deadline,
    constraint: Option<Constraint>,
    load_time: Option<NaiveTime>,
    delivery_time: Option<NaiveTime>,
}

impl Parcel {
    /// Creates an unconstrained parcel.
    ///
    /// `id` must be positive; `destination` is a location index in the
    /// owning graph.
    pub fn new(id: u32, destination: usize, mass_kg: f64, deadline: Deadline) -> Self {
        debug_assert!(id > 0);
        Self {
            id,
            destination,
            mass_kg,
            deadline,
            constraint: None,
            load_time: None,
            delivery_time: None,
        }
    }

    /// Attaches a delivery constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Parcel id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Destination location index.
    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Mass in kilograms.
    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    /// Delivery deadline.
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Delivery constraint, if any.
    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// The only vehicle allowed to carry this parcel, if restricted.
    pub fn restricted_to(&self) -> Option<usize> {
        match self.constraint {
            Some(Constraint::TruckOnly(vehicle)) => Some(vehicle),
            _ => None,
        }
    }

    /// When the parcel becomes loadable, if it is delayed or misaddressed.
    pub fn available_at(&self) -> Option<NaiveTime> {
        match self.constraint {
            Some(Constraint::Delayed { available_at })
            | Some(Constraint::Misaddressed { available_at, .. }) => Some(available_at),
            _ => None,
        }
    }

    /// Parcels this one must share a trip with (empty if unconstrained).
    pub fn deliver_with(&self) -> &[u32] {
        match &self.constraint {
            Some(Constraint::DeliverWith(ids)) => ids,
            _ => &[],
        }
    }

    /// When the parcel was loaded, if it has been.
    pub fn load_time(&self) -> Option<NaiveTime> {
        self.load_time
    }

    /// When the parcel was delivered, if it has been.
    pub fn delivery_time(&self) -> Option<NaiveTime> {
        self.delivery_time
    }

    /// Stamps the load time.
    pub fn record_load(&mut self, at: NaiveTime) {
        self.load_time = Some(at);
    }

    /// Stamps the delivery time.
    pub fn record_delivery(&mut self, at: NaiveTime) {
        debug_assert!(self.load_time.map_or(false, |l| l <= at));
        self.delivery_time = Some(at);
    }

    /// Classifies where this parcel is at the queried time.
    ///
    /// At the depot while the load stamp is unset or the query time
    /// precedes it; delivered once the delivery stamp is set and the query
    /// time has reached it; en route in between.
    pub fn status_at(&self, at: NaiveTime) -> ParcelStatus {
        match (self.load_time, self.delivery_time) {
            (None, _) => ParcelStatus::AtDepot,
            (Some(loaded), _) if at < loaded => ParcelStatus::AtDepot,
            (_, Some(delivered)) if at >= delivered => ParcelStatus::Delivered { at: delivered },
            (Some(loaded), _) => ParcelStatus::EnRoute { since: loaded },
        }
    }
}
