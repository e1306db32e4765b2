//! Open-addressing parcel store.

use tracing::debug;

use crate::error::StoreError;
use crate::models::Parcel;

/// One slot of the probe table.
///
/// An empty slot terminates a negative search; a tombstone must not, so
/// probe chains stay intact across deletion.
#[derive(Debug, Clone)]
enum Slot {
    Empty,
    Tombstone,
    Occupied(Parcel),
}

/// An associative store mapping parcel id to parcel.
///
/// Physically an open-addressing table: the home slot for id `k` is
/// `(k - 1) mod capacity`, collisions probe forward linearly with
/// wraparound. After any insert the table keeps at least half its slots
/// free of live entries — once live entries plus tombstones pass half the
/// capacity, the table doubles and every live entry rehashes (tombstones
/// are dropped).
///
/// # Examples
///
/// ```
/// use parcel_dispatch::models::{Deadline, Parcel};
/// use parcel_dispatch::store::ParcelStore;
///
/// let mut store = ParcelStore::with_capacity(4);
/// store
///     .insert(Parcel::new(1, 2, 21.0, Deadline::EndOfDay))
///     .expect("free slot");
/// assert_eq!(store.search(1).expect("present").id(), 1);
/// assert!(store.search(2).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ParcelStore {
    slots: Vec<Slot>,
    live: usize,
    tombstones: usize,
}

impl ParcelStore {
    /// Creates a store with the given initial capacity (at least one slot).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; capacity.max(1)],
            live: 0,
            tombstones: 0,
        }
    }

    /// Creates a store sized for a manifest of `count` parcels, leaving the
    /// table half empty up front.
    pub fn for_manifest(count: usize) -> Self {
        Self::with_capacity(count * 2)
    }

    /// Number of live parcels.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no live parcels are stored.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Current table capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts a parcel, growing the table if the fill ratio passes 1/2.
    ///
    /// Fails with [`StoreError::TableExhausted`] only if a probe wraps the
    /// whole table — impossible while the growth contract holds, so a
    /// failure here halts the engine instead of guessing.
    pub fn insert(&mut self, parcel: Parcel) -> Result<(), StoreError> {
        self.place(parcel)?;
        self.live += 1;
        if (self.live + self.tombstones) * 2 > self.slots.len() {
            self.grow()?;
        }
        Ok(())
    }

    /// Returns the live parcel with the given id.
    pub fn search(&self, id: u32) -> Result<&Parcel, StoreError> {
        let index = self.find_slot(id).ok_or(StoreError::NotFound(id))?;
        match &self.slots[index] {
            Slot::Occupied(parcel) => Ok(parcel),
            _ => Err(StoreError::NotFound(id)),
        }
    }

    /// Returns the live parcel with the given id, mutably.
    pub fn search_mut(&mut self, id: u32) -> Result<&mut Parcel, StoreError> {
        let index = self.find_slot(id).ok_or(StoreError::NotFound(id))?;
        match &mut self.slots[index] {
            Slot::Occupied(parcel) => Ok(parcel),
            _ => Err(StoreError::NotFound(id)),
        }
    }

    /// Removes the parcel with the given id, leaving a tombstone so probe
    /// chains through this slot stay intact.
    pub fn remove(&mut self, id: u32) -> Result<(), StoreError> {
        let index = self.find_slot(id).ok_or(StoreError::NotFound(id))?;
        self.slots[index] = Slot::Tombstone;
        self.live -= 1;
        self.tombstones += 1;
        Ok(())
    }

    /// Iterates over all live parcels in table order.
    ///
    /// Table order is probe-slot order, not insertion order, and carries no
    /// meaning.
    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(parcel) => Some(parcel),
            _ => None,
        })
    }

    /// Probes from the home slot for a live entry matching `id`.
    ///
    /// Tombstones are skipped; an empty slot ends the search.
    fn find_slot(&self, id: u32) -> Option<usize> {
        let capacity = self.slots.len();
        let home = (id as usize).wrapping_sub(1) % capacity;
        for offset in 0..capacity {
            let index = (home + offset) % capacity;
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(parcel) if parcel.id() == id => return Some(index),
                Slot::Occupied(_) => {}
            }
        }
        None
    }

    /// Writes a parcel into the first free slot on its probe chain.
    fn place(&mut self, parcel: Parcel) -> Result<(), StoreError> {
        let capacity = self.slots.len();
        let home = (parcel.id() as usize).wrapping_sub(1) % capacity;
        for offset in 0..capacity {
            let index = (home + offset) % capacity;
            if matches!(self.slots[index], Slot::Occupied(_)) {
                continue;
            }
            if matches!(self.slots[index], Slot::Tombstone) {
                self.tombstones -= 1;
            }
            self.slots[index] = Slot::Occupied(parcel);
            return Ok(());
        }
        Err(StoreError::TableExhausted {
            capacity,
            live: self.live,
        })
    }

    /// Doubles the table and rehashes every live entry, dropping tombstones.
    fn grow(&mut self) -> Result<(), StoreError> {
        let new_capacity = self.slots.len() * 2;
        debug!(
            "parcel table growing from {} to {} slots ({} live)",
            self.slots.len(),
            new_capacity,
            self.live
        );
        let old = std::mem::replace(&mut self.slots, vec![Slot::Empty; new_capacity]);
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied(parcel) = slot {
                self.place(parcel)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Deadline;
    use proptest::prelude::*;

    fn parcel(id: u32) -> Parcel {
        Parcel::new(id, 0, 1.0, Deadline::EndOfDay)
    }

    #[test]
    fn test_insert_search() {
        let mut store = ParcelStore::with_capacity(8);
        for id in 1..=4 {
            store.insert(parcel(id)).expect("free slot");
        }
        assert_eq!(store.len(), 4);
        for id in 1..=4 {
            assert_eq!(store.search(id).expect("present").id(), id);
        }
        assert_eq!(store.search(5), Err(StoreError::NotFound(5)));
    }

    #[test]
    fn test_collision_probing() {
        // Ids 1 and 9 share home slot 0 at capacity 8.
        let mut store = ParcelStore::with_capacity(8);
        store.insert(parcel(1)).expect("free slot");
        store.insert(parcel(9)).expect("free slot");
        assert_eq!(store.search(1).expect("present").id(), 1);
        assert_eq!(store.search(9).expect("present").id(), 9);
    }

    #[test]
    fn test_remove_then_search() {
        let mut store = ParcelStore::with_capacity(8);
        store.insert(parcel(1)).expect("free slot");
        store.remove(1).expect("present");
        assert_eq!(store.search(1), Err(StoreError::NotFound(1)));
        assert_eq!(store.remove(1), Err(StoreError::NotFound(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_tombstone_keeps_probe_chain() {
        // 1 and 9 collide at home slot 0; removing 1 must not strand 9.
        let mut store = ParcelStore::with_capacity(8);
        store.insert(parcel(1)).expect("free slot");
        store.insert(parcel(9)).expect("free slot");
        store.remove(1).expect("present");
        assert_eq!(store.search(9).expect("present").id(), 9);
    }

    #[test]
    fn test_tombstone_negative_search() {
        // A never-inserted id probing through a tombstone still reports
        // not-found, neither falsely found nor terminated early.
        let mut store = ParcelStore::with_capacity(8);
        for id in 1..=3 {
            store.insert(parcel(id)).expect("free slot");
        }
        store.remove(2).expect("present");
        // Home slot of 10 is 1, now a tombstone; 3 sits beyond it.
        assert_eq!(store.search(10), Err(StoreError::NotFound(10)));
        assert_eq!(store.search(3).expect("present").id(), 3);
    }

    #[test]
    fn test_reinsert_reuses_tombstone() {
        let mut store = ParcelStore::with_capacity(8);
        store.insert(parcel(1)).expect("free slot");
        store.remove(1).expect("present");
        store.insert(parcel(1)).expect("free slot");
        assert_eq!(store.search(1).expect("present").id(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_growth_doubles_and_rehashes() {
        let mut store = ParcelStore::with_capacity(4);
        store.insert(parcel(1)).expect("free slot");
        store.insert(parcel(2)).expect("free slot");
        assert_eq!(store.capacity(), 4);
        // Third insert pushes the fill ratio past 1/2.
        store.insert(parcel(3)).expect("free slot");
        assert_eq!(store.capacity(), 8);
        for id in 1..=3 {
            assert_eq!(store.search(id).expect("present").id(), id);
        }
    }

    #[test]
    fn test_tombstones_count_toward_growth() {
        let mut store = ParcelStore::with_capacity(4);
        store.insert(parcel(1)).expect("free slot");
        store.remove(1).expect("present");
        store.insert(parcel(2)).expect("free slot");
        assert_eq!(store.capacity(), 4);
        store.insert(parcel(3)).expect("free slot");
        // Two live plus one tombstone passed 1/2; rehash drops the tombstone.
        assert_eq!(store.capacity(), 8);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_iter_yields_live_only() {
        let mut store = ParcelStore::with_capacity(8);
        for id in 1..=3 {
            store.insert(parcel(id)).expect("free slot");
        }
        store.remove(2).expect("present");
        let mut ids: Vec<u32> = store.iter().map(|p| p.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);
    }

    proptest! {
        #[test]
        fn prop_round_trip(ids in proptest::collection::hash_set(1u32..10_000, 1..64)) {
            let mut store = ParcelStore::with_capacity(2);
            for &id in &ids {
                store.insert(parcel(id)).expect("free slot");
            }
            for &id in &ids {
                prop_assert_eq!(store.search(id).expect("present").id(), id);
            }
            prop_assert_eq!(store.len(), ids.len());
        }

        #[test]
        fn prop_half_free_at_rest(ids in proptest::collection::hash_set(1u32..10_000, 1..64)) {
            let mut store = ParcelStore::with_capacity(2);
            for &id in &ids {
                store.insert(parcel(id)).expect("free slot");
            }
            prop_assert!(store.len() * 2 <= store.capacity());
        }

        #[test]
        fn prop_removed_ids_not_found(
            ids in proptest::collection::hash_set(1u32..200, 2..32),
        ) {
            let mut store = ParcelStore::with_capacity(2);
            let ids: Vec<u32> = ids.into_iter().collect();
            for &id in &ids {
                store.insert(parcel(id)).expect("free slot");
            }
            let (gone, kept) = ids.split_at(ids.len() / 2);
            for &id in gone {
                store.remove(id).expect("present");
            }
            for &id in gone {
                prop_assert_eq!(store.search(id), Err(StoreError::NotFound(id)));
            }
            for &id in kept {
                prop_assert_eq!(store.search(id).expect("present").id(), id);
            }
        }
    }
}
