//! Immutable weighted graph over depot and delivery locations.

use crate::error::InputError;
use crate::models::Location;

/// Index of the depot in every location graph.
pub const DEPOT: usize = 0;

/// A fully-connected undirected weighted graph over delivery locations.
///
/// Each location stores distances only to lower-indexed locations; the
/// symmetric half is resolved through the peer's row, so
/// `distance(a, b) == distance(b, a)` by construction and self-distance is
/// always zero. Immutable once built.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::graph::LocationGraph;
/// use parcel_dispatch::models::Location;
///
/// let graph = LocationGraph::new(vec![
///     Location::new("Hub", "4001 South 700 East", "84107", vec![]),
///     Location::new("A", "195 W Oakland Ave", "84115", vec![5.0]),
///     Location::new("B", "2530 S 500 E", "84106", vec![3.0, 4.0]),
/// ])
/// .expect("triangular rows");
///
/// assert_eq!(graph.distance(0, 2), 3.0);
/// assert_eq!(graph.distance(2, 0), 3.0);
/// assert_eq!(graph.distance(1, 1), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LocationGraph {
    locations: Vec<Location>,
}

impl LocationGraph {
    /// Builds a graph from locations in index order.
    ///
    /// Row `i` must carry exactly `i` distances (one per lower-indexed
    /// location); anything else is an [`InputError::BadDistanceRow`].
    pub fn new(locations: Vec<Location>) -> Result<Self, InputError> {
        for (row, location) in locations.iter().enumerate() {
            let got = location.distance_row().len();
            if got != row {
                return Err(InputError::BadDistanceRow {
                    row,
                    got,
                    expected: row,
                });
            }
        }
        Ok(Self { locations })
    }

    /// Number of locations (including the depot).
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if the graph holds no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The location at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    /// Direct distance between two locations.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        if a == b {
            assert!(a < self.locations.len());
            return 0.0;
        }
        if b < a {
            self.locations[a].distance_row()[b]
        } else {
            self.locations[b].distance_row()[a]
        }
    }

    /// Finds the location index matching a street address and postal code.
    pub fn find_by_address(&self, street: &str, zip: &str) -> Option<usize> {
        self.locations
            .iter()
            .position(|l| l.street() == street && l.zip() == zip)
    }

    /// Shortest-path distance from `from` to `to` over the full graph.
    ///
    /// Dijkstra with an unvisited working set: tentative distances start at
    /// infinity except the source, the nearest unvisited location relaxes
    /// its edges, and the search stops as soon as `to` is nearest — the
    /// rest of the graph is not exhausted. Direct edges are not assumed
    /// shortest; a detour through intermediate locations wins when the
    /// table says so.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn shortest_distance(&self, from: usize, to: usize) -> f64 {
        let n = self.locations.len();
        let mut tentative = vec![f64::INFINITY; n];
        let mut visited = vec![false; n];
        tentative[from] = 0.0;

        loop {
            let mut nearest: Option<usize> = None;
            for v in 0..n {
                if visited[v] || !tentative[v].is_finite() {
                    continue;
                }
                if nearest.map_or(true, |u| tentative[v] < tentative[u]) {
                    nearest = Some(v);
                }
            }
            let Some(u) = nearest else {
                break;
            };
            if u == to {
                return tentative[u];
            }
            visited[u] = true;
            for v in 0..n {
                if visited[v] {
                    continue;
                }
                let relaxed = tentative[u] + self.distance(u, v);
                if relaxed < tentative[v] {
                    tentative[v] = relaxed;
                }
            }
        }

        tentative[to]
    }
}
