//! Parcel-manifest ingestion and the special-notes grammar.

use std::io::Read;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::InputError;
use crate::graph::LocationGraph;
use crate::models::{Constraint, Deadline, Parcel};

/// Supplies the details an annotation only implies.
///
/// The manifest's special-notes column marks a parcel delayed or
/// misaddressed but does not carry the arrival time or the corrected
/// address. Callers implement this trait to answer from whatever source
/// they have (an operator prompt, a supplemental table, a test fixture).
pub trait AnnotationResolver {
    /// The wall-clock time the parcel reaches the depot.
    fn arrival_time(&mut self, parcel: u32, note: &str) -> Result<NaiveTime, InputError>;

    /// The corrected `(street, zip)` for a misaddressed parcel.
    fn corrected_address(&mut self, parcel: u32, note: &str)
        -> Result<(String, String), InputError>;
}

#[derive(Debug, Deserialize)]
struct ManifestRecord {
    #[serde(rename = "Package ID")]
    id: u32,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Zip")]
    zip: String,
    #[serde(rename = "Delivery Deadline")]
    deadline: String,
    #[serde(rename = "MassKG")]
    mass_kg: f64,
    #[serde(rename = "Special Notes")]
    notes: String,
}

/// Reads the parcel manifest, resolving every destination against the graph.
///
/// Misaddressed parcels resolve through their corrected address. Any
/// malformed field fails the whole read.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::error::InputError;
/// use parcel_dispatch::input::{read_distance_table, read_manifest, AnnotationResolver};
///
/// struct NoPrompts;
/// impl AnnotationResolver for NoPrompts {
///     fn arrival_time(&mut self, parcel: u32, note: &str) -> Result<NaiveTime, InputError> {
///         Err(InputError::BadAnnotation { parcel, note: note.to_string() })
///     }
///     fn corrected_address(
///         &mut self,
///         parcel: u32,
///         note: &str,
///     ) -> Result<(String, String), InputError> {
///         Err(InputError::BadAnnotation { parcel, note: note.to_string() })
///     }
/// }
///
/// let graph = read_distance_table(
///     "Hub,4001 South 700 East,84107\nStop A,195 W Oakland Ave,84115,5\n".as_bytes(),
/// )
/// .expect("well-formed");
/// let manifest = "\
/// Package ID,Address,City,State,Zip,Delivery Deadline,MassKG,Special Notes
/// 1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30 AM,21,
/// ";
/// let parcels = read_manifest(manifest.as_bytes(), &graph, &mut NoPrompts)
///     .expect("well-formed");
/// assert_eq!(parcels.len(), 1);
/// assert_eq!(parcels[0].destination(), 1);
/// ```
pub fn read_manifest<R: Read>(
    reader: R,
    graph: &LocationGraph,
    resolver: &mut dyn AnnotationResolver,
) -> Result<Vec<Parcel>, InputError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut parcels = Vec::new();

    for record in csv_reader.deserialize() {
        let record: ManifestRecord = record?;
        if record.id == 0 {
            return Err(InputError::ZeroParcelId);
        }
        let deadline = parse_deadline(&record.deadline)?;
        let constraint = parse_annotation(record.id, record.notes.trim(), resolver)?;

        let (street, zip) = match &constraint {
            Some(Constraint::Misaddressed { street, zip, .. }) => {
                (street.clone(), zip.clone())
            }
            _ => (record.address.trim().to_string(), record.zip.trim().to_string()),
        };
        let destination =
            graph
                .find_by_address(&street, &zip)
                .ok_or_else(|| InputError::UnknownAddress {
                    parcel: record.id,
                    street,
                    zip,
                })?;

        let mut parcel = Parcel::new(record.id, destination, record.mass_kg, deadline);
        if let Some(constraint) = constraint {
            parcel = parcel.with_constraint(constraint);
        }
        parcels.push(parcel);
    }

    Ok(parcels)
}

/// Parses a deadline cell: `EOD` (any case) or a wall-clock time.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::input::parse_deadline;
/// use parcel_dispatch::models::Deadline;
///
/// assert_eq!(parse_deadline("EOD").expect("valid"), Deadline::EndOfDay);
/// assert!(matches!(
///     parse_deadline("10:30 AM").expect("valid"),
///     Deadline::At(_)
/// ));
/// ```
pub fn parse_deadline(text: &str) -> Result<Deadline, InputError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("EOD") {
        return Ok(Deadline::EndOfDay);
    }
    for format in ["%I:%M %p", "%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return Ok(Deadline::At(time));
        }
    }
    Err(InputError::BadDeadline(text.to_string()))
}

/// Parses a special-notes annotation into a [`Constraint`].
///
/// The grammar matches by prefix: `Can only be on truck <N>`,
/// `Delayed on flight ...`, `Wrong address listed`, and
/// `Must be delivered with <id>[,<id>...]`. An empty note means
/// unconstrained; anything else is malformed.
pub fn parse_annotation(
    parcel: u32,
    note: &str,
    resolver: &mut dyn AnnotationResolver,
) -> Result<Option<Constraint>, InputError> {
    if note.is_empty() {
        return Ok(None);
    }
    let malformed = || InputError::BadAnnotation {
        parcel,
        note: note.to_string(),
    };

    if let Some(rest) = note.strip_prefix("Can only be on truck ") {
        let vehicle = rest.trim().parse().map_err(|_| malformed())?;
        return Ok(Some(Constraint::TruckOnly(vehicle)));
    }
    if note.starts_with("Delayed on flight") {
        let available_at = resolver.arrival_time(parcel, note)?;
        return Ok(Some(Constraint::Delayed { available_at }));
    }
    if note.starts_with("Wrong address listed") {
        let (street, zip) = resolver.corrected_address(parcel, note)?;
        let available_at = resolver.arrival_time(parcel, note)?;
        return Ok(Some(Constraint::Misaddressed {
            street,
            zip,
            available_at,
        }));
    }
    if let Some(rest) = note.strip_prefix("Must be delivered with ") {
        let partners = rest
            .split(',')
            .map(|id| id.trim().parse::<u32>())
            .collect::<Result<Vec<u32>, _>>()
            .map_err(|_| malformed())?;
        if partners.is_empty() {
            return Err(malformed());
        }
        return Ok(Some(Constraint::DeliverWith(partners)));
    }

    Err(malformed())
}
