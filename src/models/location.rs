//! Delivery location type.

/// A depot or delivery location.
///
/// A location's identity is its index in the owning graph (index 0 is the
/// depot); parcels reference destinations by that index, never by pointer.
/// The distance row holds distances to every lower-indexed location, so the
/// full symmetric table is stored only once.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::models::Location;
///
/// let depot = Location::new("Hub", "4001 South 700 East", "84107", vec![]);
/// assert_eq!(depot.name(), "Hub");
/// assert!(depot.distance_row().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    street: String,
    zip: String,
    distances: Vec<f64>,
}

impl Location {
    /// Creates a location with distances to all lower-indexed locations.
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        zip: impl Into<String>,
        distances: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            street: street.into(),
            zip: zip.into(),
            distances,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street address.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Postal code.
    pub fn zip(&self) -> &str {
        &self.zip
    }

    /// Distances to every lower-indexed location, in index order.
    pub fn distance_row(&self) -> &[f64] {
        &self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_fields() {
        let l = Location::new("Stop B", "2530 S 500 E", "84106", vec![3.0, 4.0]);
        assert_eq!(l.name(), "Stop B");
        assert_eq!(l.street(), "2530 S 500 E");
        assert_eq!(l.zip(), "84106");
        assert_eq!(l.distance_row(), &[3.0, 4.0]);
    }
}
