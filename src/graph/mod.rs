//! Location graph over the depot and delivery addresses.
//!
//! Stores the symmetric distance table once, in lower-triangular rows.

mod location_graph;

pub use location_graph::{LocationGraph, DEPOT};
