//! Deadline-priority queue of unassigned parcels.

use std::collections::VecDeque;

use crate::error::StoreError;
use crate::store::ParcelStore;

/// The queue of parcels waiting for a vehicle.
///
/// Loading pops from the front; parcels a cycle cannot take are deferred
/// into a side buffer and restored to the *front* in their original
/// relative order when the cycle ends, so they are reconsidered first next
/// cycle.
///
/// # Examples
///
/// ```
/// use parcel_dispatch::planner::PendingQueue;
///
/// let mut queue = PendingQueue::from_ids([4, 7, 9]);
/// let first = queue.pop().expect("non-empty");
/// queue.defer(first);
/// queue.restore_deferred();
/// assert_eq!(queue.pop(), Some(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    queue: VecDeque<u32>,
    deferred: Vec<u32>,
}

impl PendingQueue {
    /// Creates a queue holding the given ids in order.
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: ids.into_iter().collect(),
            deferred: Vec::new(),
        }
    }

    /// Creates a queue of every live parcel, in deadline-priority order.
    ///
    /// Seeded by ascending id, then stably sorted so timed deadlines come
    /// first in ascending order and end-of-day parcels follow.
    pub fn from_store(store: &ParcelStore) -> Self {
        let mut seed: Vec<(u32, crate::models::Deadline)> =
            store.iter().map(|p| (p.id(), p.deadline())).collect();
        seed.sort_unstable_by_key(|&(id, _)| id);
        seed.sort_by_key(|&(_, deadline)| deadline);
        Self {
            queue: seed.into_iter().map(|(id, _)| id).collect(),
            deferred: Vec::new(),
        }
    }

    /// Re-sorts the queued ids into deadline-priority order.
    ///
    /// The sort is stable: equal deadlines keep their current relative
    /// order.
    pub fn sort_by_deadline(&mut self, store: &ParcelStore) -> Result<(), StoreError> {
        let mut keyed = Vec::with_capacity(self.queue.len());
        for &id in &self.queue {
            keyed.push((store.search(id)?.deadline(), id));
        }
        keyed.sort_by_key(|&(deadline, _)| deadline);
        self.queue = keyed.into_iter().map(|(_, id)| id).collect();
        Ok(())
    }

    /// Pops the next parcel to consider.
    pub fn pop(&mut self) -> Option<u32> {
        self.queue.pop_front()
    }

    /// Next parcel without removing it.
    pub fn peek(&self) -> Option<u32> {
        self.queue.front().copied()
    }

    /// Buffers a popped parcel for reconsideration next cycle.
    pub fn defer(&mut self, id: u32) {
        self.deferred.push(id);
    }

    /// Restores deferred parcels to the front of the queue, preserving
    /// their relative order.
    pub fn restore_deferred(&mut self) {
        for id in self.deferred.drain(..).rev() {
            self.queue.push_front(id);
        }
    }

    /// Drops a parcel loaded out of band (a group co-member), wherever it
    /// sits. Returns `true` if it was present.
    pub fn remove(&mut self, id: u32) -> bool {
        if let Some(pos) = self.queue.iter().position(|&queued| queued == id) {
            self.queue.remove(pos);
            return true;
        }
        if let Some(pos) = self.deferred.iter().position(|&deferred| deferred == id) {
            self.deferred.remove(pos);
            return true;
        }
        false
    }

    /// Parcels still waiting, counting the deferral buffer.
    pub fn len(&self) -> usize {
        self.queue.len() + self.deferred.len()
    }

    /// Returns `true` if nothing is waiting anywhere.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.deferred.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deadline, Parcel};
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    fn store_with_deadlines(entries: &[(u32, Deadline)]) -> ParcelStore {
        let mut store = ParcelStore::for_manifest(entries.len());
        for &(id, deadline) in entries {
            store
                .insert(Parcel::new(id, 0, 1.0, deadline))
                .expect("free slot");
        }
        store
    }

    #[test]
    fn test_deadline_priority_order() {
        let store = store_with_deadlines(&[
            (1, Deadline::EndOfDay),
            (2, Deadline::At(t(10, 30))),
            (3, Deadline::At(t(9, 0))),
            (4, Deadline::EndOfDay),
        ]);
        let mut queue = PendingQueue::from_store(&store);
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(2));
        // End-of-day parcels keep ascending-id seed order.
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let store = store_with_deadlines(&[
            (5, Deadline::At(t(10, 30))),
            (2, Deadline::At(t(10, 30))),
            (9, Deadline::At(t(10, 30))),
        ]);
        let mut queue = PendingQueue::from_ids([5, 2, 9]);
        queue.sort_by_deadline(&store).expect("all present");
        assert_eq!(queue.pop(), Some(5));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(9));
    }

    #[test]
    fn test_sort_unknown_id_fails() {
        let store = store_with_deadlines(&[(1, Deadline::EndOfDay)]);
        let mut queue = PendingQueue::from_ids([1, 42]);
        assert!(queue.sort_by_deadline(&store).is_err());
    }

    #[test]
    fn test_deferred_restored_to_front_in_order() {
        let mut queue = PendingQueue::from_ids([1, 2, 3, 4]);
        let a = queue.pop().expect("non-empty");
        let b = queue.pop().expect("non-empty");
        queue.defer(a);
        queue.defer(b);
        queue.restore_deferred();
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
    }

    #[test]
    fn test_remove_from_queue_and_deferred() {
        let mut queue = PendingQueue::from_ids([1, 2, 3]);
        let first = queue.pop().expect("non-empty");
        queue.defer(first);
        assert!(queue.remove(1)); // sits in the deferral buffer
        assert!(queue.remove(3)); // sits in the queue
        assert!(!queue.remove(9));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_len_counts_deferred() {
        let mut queue = PendingQueue::from_ids([1, 2]);
        let first = queue.pop().expect("non-empty");
        queue.defer(first);
        assert_eq!(queue.len(), 2);
        assert!(!queue.is_empty());
    }
}
