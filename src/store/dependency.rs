//! Grouped-delivery dependency index.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::InputError;
use crate::store::ParcelStore;

/// The symmetric "must ship together" relation among parcels.
///
/// Built once, after every parcel is in the store, so cross-references
/// resolve in both directions. A parcel naming a partner implies the
/// reverse edge even when the partner's own annotation omits it.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::models::{Constraint, Deadline, Parcel};
/// use parcel_dispatch::store::{DependencyIndex, ParcelStore};
///
/// let mut store = ParcelStore::with_capacity(8);
/// store
///     .insert(
///         Parcel::new(1, 0, 1.0, Deadline::EndOfDay)
///             .with_constraint(Constraint::DeliverWith(vec![2])),
///     )
///     .expect("free slot");
/// store
///     .insert(Parcel::new(2, 0, 1.0, Deadline::EndOfDay))
///     .expect("free slot");
///
/// let index = DependencyIndex::build(&store).expect("references resolve");
/// assert_eq!(index.discover_group(1), vec![1, 2]);
/// assert_eq!(index.discover_group(2), vec![1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    adjacency: HashMap<u32, Vec<u32>>,
}

impl DependencyIndex {
    /// Builds the index from every live parcel's ship-together annotation.
    ///
    /// Fails with [`InputError::UnknownDependency`] if an annotation names
    /// a parcel that is not in the store.
    pub fn build(store: &ParcelStore) -> Result<Self, InputError> {
        let mut adjacency: HashMap<u32, Vec<u32>> = HashMap::new();
        for parcel in store.iter() {
            for &partner in parcel.deliver_with() {
                if store.search(partner).is_err() {
                    return Err(InputError::UnknownDependency {
                        parcel: parcel.id(),
                        partner,
                    });
                }
                let forward = adjacency.entry(parcel.id()).or_default();
                if !forward.contains(&partner) {
                    forward.push(partner);
                }
                let backward = adjacency.entry(partner).or_default();
                if !backward.contains(&parcel.id()) {
                    backward.push(parcel.id());
                }
            }
        }
        Ok(Self { adjacency })
    }

    /// Returns `true` if the parcel belongs to any ship-together group.
    pub fn is_grouped(&self, id: u32) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// The transitive closure of parcels that must ship with `id`,
    /// including `id` itself, sorted by id.
    ///
    /// Breadth-first over the symmetric relation with an explicit visited
    /// set, so cycles terminate and the cost is proportional to the group
    /// and its edges, not the whole store.
    pub fn discover_group(&self, id: u32) -> Vec<u32> {
        let mut visited = HashSet::new();
        let mut frontier = VecDeque::new();
        visited.insert(id);
        frontier.push_back(id);
        while let Some(current) = frontier.pop_front() {
            if let Some(partners) = self.adjacency.get(&current) {
                for &partner in partners {
                    if visited.insert(partner) {
                        frontier.push_back(partner);
                    }
                }
            }
        }
        let mut group: Vec<u32> = visited.into_iter().collect();
        group.sort_unstable();
        group
    }

    /// Every distinct group in the relation, each sorted by id.
    pub fn groups(&self) -> Vec<Vec<u32>> {
        let mut keys: Vec<u32> = self.adjacency.keys().copied().collect();
        keys.sort_unstable();
        let mut seen = HashSet::new();
        let mut groups = Vec::new();
        for key in keys {
            if seen.contains(&key) {
                continue;
            }
            let group = self.discover_group(key);
            seen.extend(group.iter().copied());
            groups.push(group);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Constraint, Deadline, Parcel};

    fn grouped(id: u32, partners: Vec<u32>) -> Parcel {
        Parcel::new(id, 0, 1.0, Deadline::EndOfDay)
            .with_constraint(Constraint::DeliverWith(partners))
    }

    fn plain(id: u32) -> Parcel {
        Parcel::new(id, 0, 1.0, Deadline::EndOfDay)
    }

    #[test]
    fn test_symmetric_closure() {
        // 13 names 15; 15 names nothing; 19 names 13. All three close over
        // each other from any starting member.
        let mut store = ParcelStore::with_capacity(16);
        store.insert(grouped(13, vec![15])).expect("free slot");
        store.insert(plain(15)).expect("free slot");
        store.insert(grouped(19, vec![13])).expect("free slot");
        store.insert(plain(20)).expect("free slot");

        let index = DependencyIndex::build(&store).expect("resolvable");
        let expected = vec![13, 15, 19];
        assert_eq!(index.discover_group(13), expected);
        assert_eq!(index.discover_group(15), expected);
        assert_eq!(index.discover_group(19), expected);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut store = ParcelStore::with_capacity(8);
        store.insert(grouped(1, vec![2])).expect("free slot");
        store.insert(grouped(2, vec![1])).expect("free slot");
        let index = DependencyIndex::build(&store).expect("resolvable");
        assert_eq!(index.discover_group(1), vec![1, 2]);
        assert_eq!(index.discover_group(2), vec![1, 2]);
    }

    #[test]
    fn test_singleton_group() {
        let mut store = ParcelStore::with_capacity(8);
        store.insert(plain(5)).expect("free slot");
        let index = DependencyIndex::build(&store).expect("resolvable");
        assert!(!index.is_grouped(5));
        assert_eq!(index.discover_group(5), vec![5]);
    }

    #[test]
    fn test_unknown_partner_rejected() {
        let mut store = ParcelStore::with_capacity(8);
        store.insert(grouped(1, vec![99])).expect("free slot");
        let err = DependencyIndex::build(&store).expect_err("99 missing");
        assert!(matches!(
            err,
            InputError::UnknownDependency {
                parcel: 1,
                partner: 99
            }
        ));
    }

    #[test]
    fn test_distinct_groups() {
        let mut store = ParcelStore::with_capacity(16);
        store.insert(grouped(1, vec![2])).expect("free slot");
        store.insert(plain(2)).expect("free slot");
        store.insert(grouped(7, vec![8])).expect("free slot");
        store.insert(plain(8)).expect("free slot");
        let index = DependencyIndex::build(&store).expect("resolvable");
        assert_eq!(index.groups(), vec![vec![1, 2], vec![7, 8]]);
    }
}
