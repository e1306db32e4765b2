//! Failure taxonomy for the dispatch engine.
//!
//! Deferred loading and deferred routing are expected control flow and never
//! appear here. Errors split by boundary: [`StoreError`] from the parcel
//! store, [`InputError`] from table ingestion (any of these must prevent
//! engine startup), and [`DispatchError`] from the dispatch loop.

use thiserror::Error;

/// Errors raised by the parcel store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested parcel id is not in the store.
    #[error("parcel {0} is not in the store")]
    NotFound(u32),
    /// A probe wrapped the entire table without finding a free slot.
    ///
    /// The growth contract keeps at least half the table free, so this
    /// signals a defect in capacity maintenance, not a caller mistake.
    #[error("probe wrapped the whole table without a free slot ({live} live of {capacity})")]
    TableExhausted {
        /// Table capacity at the time of the failed probe.
        capacity: usize,
        /// Live entries at the time of the failed probe.
        live: usize,
    },
}

/// Errors raised while ingesting the distance table or the parcel manifest.
#[derive(Error, Debug)]
pub enum InputError {
    /// A deadline field was neither `EOD` nor a recognizable wall-clock time.
    #[error("unparseable deadline {0:?}")]
    BadDeadline(String),
    /// A timestamp supplied for a delayed or misaddressed parcel did not parse.
    #[error("unparseable timestamp {0:?}")]
    BadTimestamp(String),
    /// A required column was absent from a row.
    #[error("row {row} is missing the {field} field")]
    MissingField {
        /// Zero-based row index.
        row: usize,
        /// Column name.
        field: &'static str,
    },
    /// A distance cell did not parse as a number.
    #[error("row {row} holds an unparseable distance {value:?}")]
    BadDistance {
        /// Zero-based row index.
        row: usize,
        /// Offending cell text.
        value: String,
    },
    /// A distance row does not carry one entry per lower-indexed location.
    #[error("distance row {row} has {got} entries, expected {expected}")]
    BadDistanceRow {
        /// Zero-based row index.
        row: usize,
        /// Entries found.
        got: usize,
        /// Entries required.
        expected: usize,
    },
    /// A manifest row used the reserved id 0.
    #[error("parcel id 0 is not a valid identifier")]
    ZeroParcelId,
    /// No location in the graph matches a parcel's street address and zip.
    #[error("no location matches {street:?} / {zip:?} for parcel {parcel}")]
    UnknownAddress {
        /// Parcel whose destination failed to resolve.
        parcel: u32,
        /// Street address searched for.
        street: String,
        /// Postal code searched for.
        zip: String,
    },
    /// A special-notes annotation matched none of the known forms.
    #[error("unrecognized annotation for parcel {parcel}: {note:?}")]
    BadAnnotation {
        /// Parcel carrying the annotation.
        parcel: u32,
        /// Raw annotation text.
        note: String,
    },
    /// A grouped-delivery annotation names a parcel that is not in the store.
    #[error("parcel {parcel} must be delivered with unknown parcel {partner}")]
    UnknownDependency {
        /// Parcel carrying the annotation.
        parcel: u32,
        /// The unresolved partner id.
        partner: u32,
    },
    /// The underlying csv reader failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by the dispatch loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A grouped-delivery closure is larger than every vehicle in the fleet,
    /// so it could never load atomically.
    #[error(
        "dependency group of {size} parcels (containing parcel {parcel}) \
         exceeds the largest vehicle capacity of {max_capacity}"
    )]
    UnsatisfiableGroup {
        /// One member of the oversized group.
        parcel: u32,
        /// Group size.
        size: usize,
        /// Largest vehicle capacity in the fleet.
        max_capacity: usize,
    },
    /// A full pass over the fleet loaded nothing while parcels remain
    /// pending. Vehicle clocks only advance by driving, so the remaining
    /// parcels can never become loadable.
    #[error("no vehicle could load any of the {remaining} pending parcels")]
    Stalled {
        /// Parcels still pending when progress stopped.
        remaining: usize,
    },
    /// A store lookup failed mid-dispatch.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::NotFound(7).to_string(),
            "parcel 7 is not in the store"
        );
        let e = StoreError::TableExhausted {
            capacity: 8,
            live: 4,
        };
        assert!(e.to_string().contains("without a free slot"));
    }

    #[test]
    fn test_dispatch_error_from_store() {
        let e: DispatchError = StoreError::NotFound(3).into();
        assert_eq!(e, DispatchError::Store(StoreError::NotFound(3)));
    }

    #[test]
    fn test_input_error_display() {
        let e = InputError::UnknownAddress {
            parcel: 9,
            street: "300 State St".to_string(),
            zip: "84103".to_string(),
        };
        assert!(e.to_string().contains("parcel 9"));
    }
}
