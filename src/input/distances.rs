//! Distance-table ingestion.

use std::io::Read;

use crate::error::InputError;
use crate::graph::LocationGraph;
use crate::models::Location;

/// Reads the distance table into a [`LocationGraph`].
///
/// Rows carry name, street address, postal code, then distances to every
/// earlier row; row 0 is the depot and carries no distances. Trailing blank
/// cells are tolerated (spreadsheet exports pad rows to equal width); a
/// blank cell ends the row's distance list.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::input::read_distance_table;
///
/// let table = "\
/// Hub,4001 South 700 East,84107
/// Stop A,195 W Oakland Ave,84115,5
/// Stop B,2530 S 500 E,84106,3,4
/// ";
/// let graph = read_distance_table(table.as_bytes()).expect("well-formed");
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.distance(1, 2), 4.0);
/// ```
pub fn read_distance_table<R: Read>(reader: R) -> Result<LocationGraph, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut locations = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let name = field(&record, row, 0, "name")?;
        let street = field(&record, row, 1, "address")?;
        let zip = field(&record, row, 2, "zip")?;

        let mut distances = Vec::new();
        for cell in record.iter().skip(3) {
            let cell = cell.trim();
            if cell.is_empty() {
                break;
            }
            let distance: f64 = cell.parse().map_err(|_| InputError::BadDistance {
                row,
                value: cell.to_string(),
            })?;
            distances.push(distance);
        }

        locations.push(Location::new(name, street, zip, distances));
    }

    LocationGraph::new(locations)
}

fn field(
    record: &csv::StringRecord,
    row: usize,
    index: usize,
    name: &'static str,
) -> Result<String, InputError> {
    record
        .get(index)
        .map(|value| value.trim().to_string())
        .ok_or(InputError::MissingField { row, field: name })
}
