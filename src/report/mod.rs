//! Point-in-time parcel status reports.

use chrono::NaiveTime;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::ParcelStatus;
use crate::store::ParcelStore;

/// One parcel's status at the queried time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRow {
    /// Parcel id.
    pub parcel: u32,
    /// Where the parcel is at the queried time.
    #[serde(flatten)]
    pub status: ParcelStatus,
}

/// Where one parcel is at the queried time.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::models::{Deadline, Parcel, ParcelStatus};
/// use parcel_dispatch::report::parcel_status;
/// use parcel_dispatch::store::ParcelStore;
///
/// let mut store = ParcelStore::with_capacity(4);
/// store
///     .insert(Parcel::new(1, 1, 2.0, Deadline::EndOfDay))
///     .expect("free slot");
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid");
/// assert_eq!(
///     parcel_status(&store, 1, nine).expect("present"),
///     ParcelStatus::AtDepot
/// );
/// assert!(parcel_status(&store, 42, nine).is_err());
/// ```
pub fn parcel_status(
    store: &ParcelStore,
    id: u32,
    at: NaiveTime,
) -> Result<ParcelStatus, StoreError> {
    Ok(store.search(id)?.status_at(at))
}

/// Every live parcel's status at the queried time, ordered by id.
pub fn fleet_status(store: &ParcelStore, at: NaiveTime) -> Vec<StatusRow> {
    let mut rows: Vec<StatusRow> = store
        .iter()
        .map(|parcel| StatusRow {
            parcel: parcel.id(),
            status: parcel.status_at(at),
        })
        .collect();
    rows.sort_unstable_by_key(|row| row.parcel);
    rows
}
