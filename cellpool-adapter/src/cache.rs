use hashbrown::HashMap;

use cellpool::{ContentTicket, IndexKey, ReconcileError, SlotKey, SlotTracker};

/// Materialized content per slot, tagged with the index it was computed for.
#[derive(Clone, Debug)]
pub struct ContentCache<S, I, C> {
    entries: HashMap<S, (I, C)>,
}

impl<S: SlotKey, I: IndexKey, C> Default for ContentCache<S, I, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SlotKey, I: IndexKey, C> ContentCache<S, I, C> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, slot: &S) -> Option<&C> {
        self.entries.get(slot).map(|(_, c)| c)
    }

    /// The index the cached content of `slot` was computed for.
    pub fn index_of(&self, slot: &S) -> Option<&I> {
        self.entries.get(slot).map(|(i, _)| i)
    }

    /// Whether `slot` has content computed for the index it currently renders.
    pub fn is_fresh(&self, tracker: &SlotTracker<S, I>, slot: &S) -> bool {
        match (self.index_of(slot), tracker.live_index_for_slot(slot)) {
            (Some(cached), Some(live)) => cached == live,
            _ => false,
        }
    }

    pub fn insert(&mut self, slot: S, index: I, content: C) -> Option<C> {
        self.entries.insert(slot, (index, content)).map(|(_, c)| c)
    }

    /// Stores the result of a computation started with `ticket`, unless the slot has since been
    /// reassigned or evicted.
    pub fn commit(
        &mut self,
        tracker: &SlotTracker<S, I>,
        ticket: ContentTicket<S, I>,
        content: C,
    ) -> Result<(), ReconcileError<S, I>> {
        if !tracker.is_current(&ticket) {
            let current = tracker.live_index_for_slot(&ticket.slot).cloned();
            return Err(ReconcileError::StaleComputationDiscarded {
                slot: ticket.slot,
                started_for: ticket.index,
                current,
            });
        }
        self.entries.insert(ticket.slot, (ticket.index, content));
        Ok(())
    }

    pub fn invalidate(&mut self, slot: &S) -> Option<C> {
        self.entries.remove(slot).map(|(_, c)| c)
    }

    /// Drops entries whose slot no longer renders the index they were computed for.
    pub fn retain_fresh(&mut self, tracker: &SlotTracker<S, I>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|s, (i, _)| tracker.live_index_for_slot(s) == Some(&*i));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
