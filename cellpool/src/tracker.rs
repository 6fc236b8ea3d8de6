use alloc::vec::Vec;

use crate::key::{ForwardMap, ReverseMap};
use crate::{Assignment, ContentTicket, IndexKey, SlotKey, TrackerSnapshot};

/// The slot ⇄ index reconciliation index.
///
/// Two maps are kept:
/// - `by_index` (index → slot) is authoritative for what is currently shown. It holds at most one
///   slot per index, the most recently assigned one, in insertion order.
/// - `by_slot` (slot → index) is a back-reference used for O(1) "what was this slot showing
///   before" lookups. It is *not* authoritative: when another slot claims an index, the loser's
///   back-reference keeps naming that index until the loser is reassigned, released, or pruned.
///
/// Every `by_index` entry is mirrored by `by_slot` (`by_slot[by_index[i]] == i`), so a slot is
/// live exactly when its back-reference points at an index it still owns.
///
/// This type holds no UI objects and never creates or destroys slots; it only observes the
/// identities the host hands to it.
#[derive(Clone, Debug)]
pub struct SlotTracker<S, I> {
    by_index: ReverseMap<I, S>,
    by_slot: ForwardMap<S, I>,
}

impl<S: SlotKey, I: IndexKey> Default for SlotTracker<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SlotKey, I: IndexKey> SlotTracker<S, I> {
    pub fn new() -> Self {
        Self {
            by_index: ReverseMap::default(),
            by_slot: ForwardMap::default(),
        }
    }

    /// Creates a tracker pre-sized for a pool of `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_index: ReverseMap::with_capacity_and_hasher(capacity, Default::default()),
            by_slot: ForwardMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Makes `slot` the renderer of `index`.
    ///
    /// - If another slot rendered `index`, it is evicted from the index map. Its back-reference is
    ///   left untouched and keeps naming `index` (see [`Self::lookup_index_for_slot`]).
    /// - If `slot` still owned its previous index, that entry is removed, so no index is ever left
    ///   pointing at a slot that has moved on.
    ///
    /// An occupied index is the normal steady state while a list scrolls, so this never fails.
    /// Calling it twice with the same arguments is the same as calling it once.
    pub fn assign(&mut self, slot: S, index: I) -> Assignment<S, I> {
        let unchanged = self.by_index.get(&index) == Some(&slot);
        let previous_index = self.by_slot.insert(slot.clone(), index.clone());

        if let Some(prev) = &previous_index {
            if *prev != index && self.by_index.get(prev) == Some(&slot) {
                self.by_index.shift_remove(prev);
            }
        }

        let evicted = match self.by_index.shift_remove(&index) {
            Some(incumbent) if incumbent != slot => Some(incumbent),
            _ => None,
        };
        ctrace!(
            slot = ?slot,
            previous = ?previous_index,
            index = ?index,
            evicted = ?evicted,
            "SlotTracker::assign"
        );
        self.by_index.insert(index, slot);

        Assignment {
            previous_index,
            evicted,
            unchanged,
        }
    }

    /// The index `slot` was last assigned, live or not.
    ///
    /// This is the non-authoritative back-reference: after another slot claimed the same index,
    /// this still reports it. Use [`Self::live_index_for_slot`] to ask what is actually shown.
    pub fn lookup_index_for_slot(&self, slot: &S) -> Option<&I> {
        self.by_slot.get(slot)
    }

    /// The slot currently rendering `index`.
    pub fn lookup_slot_for_index(&self, index: &I) -> Option<&S> {
        self.by_index.get(index)
    }

    /// The index `slot` renders right now, if it has not been evicted.
    pub fn live_index_for_slot(&self, slot: &S) -> Option<&I> {
        let index = self.by_slot.get(slot)?;
        (self.by_index.get(index) == Some(slot)).then_some(index)
    }

    pub fn is_live(&self, slot: &S) -> bool {
        self.live_index_for_slot(slot).is_some()
    }

    /// Whether the tracker has ever seen `slot` (and it was not released or pruned since).
    pub fn is_known(&self, slot: &S) -> bool {
        self.by_slot.contains_key(slot)
    }

    /// A snapshot of the `(index, slot)` pairs currently shown, in insertion order.
    ///
    /// Later assignments do not affect the returned value.
    pub fn current_assignments(&self) -> Assignments<S, I> {
        Assignments {
            pairs: self
                .by_index
                .iter()
                .map(|(i, s)| (i.clone(), s.clone()))
                .collect(),
        }
    }

    /// Forgets `slot` entirely. Call this when the host destroys a container.
    ///
    /// Returns the index the slot was rendering, if it was still live.
    pub fn release_slot(&mut self, slot: &S) -> Option<I> {
        let index = self.by_slot.remove(slot)?;
        let live = self.by_index.get(&index) == Some(slot);
        cdebug!(slot = ?slot, index = ?index, live, "SlotTracker::release_slot");
        if live {
            self.by_index.shift_remove(&index);
            Some(index)
        } else {
            None
        }
    }

    /// Slots whose back-reference names an index they no longer render.
    pub fn stale_slots(&self) -> impl Iterator<Item = (&S, &I)> + '_ {
        self.by_slot
            .iter()
            .filter(move |(s, i)| self.by_index.get(*i) != Some(*s))
    }

    /// Drops back-references of evicted slots. Returns how many were removed.
    pub fn prune_stale(&mut self) -> usize {
        let before = self.by_slot.len();
        let by_index = &self.by_index;
        self.by_slot.retain(|s, i| by_index.get(i) == Some(s));
        let removed = before - self.by_slot.len();
        if removed > 0 {
            cdebug!(removed, remaining = self.by_slot.len(), "SlotTracker::prune_stale");
        }
        removed
    }

    /// Drops every live assignment whose index fails `keep`.
    ///
    /// The affected slots keep their back-references and become stale. Returns the dropped
    /// `(index, slot)` pairs.
    pub fn retain_indices(&mut self, mut keep: impl FnMut(&I) -> bool) -> Vec<(I, S)> {
        let mut dropped = Vec::new();
        self.by_index.retain(|i, s| {
            if keep(i) {
                true
            } else {
                dropped.push((i.clone(), s.clone()));
                false
            }
        });
        if !dropped.is_empty() {
            cdebug!(dropped = dropped.len(), "SlotTracker::retain_indices");
        }
        dropped
    }

    /// Captures the `(slot, index)` pair a content computation for `slot` should be started for.
    ///
    /// Returns `None` when the slot is not live.
    pub fn ticket(&self, slot: &S) -> Option<ContentTicket<S, I>> {
        let index = self.live_index_for_slot(slot)?;
        Some(ContentTicket {
            slot: slot.clone(),
            index: index.clone(),
        })
    }

    /// Whether the result of a computation started with `ticket` may still be applied.
    pub fn is_current(&self, ticket: &ContentTicket<S, I>) -> bool {
        self.by_slot.get(&ticket.slot) == Some(&ticket.index)
            && self.by_index.get(&ticket.index) == Some(&ticket.slot)
    }

    /// Number of slots with a back-reference (live or stale).
    pub fn forward_len(&self) -> usize {
        self.by_slot.len()
    }

    /// Number of indexes currently rendered.
    pub fn reverse_len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    /// Iterates over the slot → index back-references without allocations.
    pub fn for_each_forward(&self, mut f: impl FnMut(&S, &I)) {
        for (s, i) in self.by_slot.iter() {
            f(s, i);
        }
    }

    /// Iterates over the index → slot map in insertion order without allocations.
    pub fn for_each_reverse(&self, mut f: impl FnMut(&I, &S)) {
        for (i, s) in self.by_index.iter() {
            f(i, s);
        }
    }

    pub fn clear(&mut self) {
        self.by_index.clear();
        self.by_slot.clear();
    }

    /// Exports both maps (useful for debugging and persistence).
    pub fn snapshot(&self) -> TrackerSnapshot<S, I> {
        let mut forward = Vec::with_capacity(self.by_slot.len());
        self.for_each_forward(|s, i| forward.push((s.clone(), i.clone())));
        let mut reverse = Vec::with_capacity(self.by_index.len());
        self.for_each_reverse(|i, s| reverse.push((i.clone(), s.clone())));
        TrackerSnapshot { forward, reverse }
    }

    /// Replaces both maps from a snapshot.
    ///
    /// Reverse entries are replayed through [`Self::assign`] in order, so the result satisfies
    /// the tracker's invariants even if the snapshot was edited by hand.
    pub fn restore(&mut self, snapshot: TrackerSnapshot<S, I>) {
        self.clear();
        for (s, i) in snapshot.forward {
            self.by_slot.insert(s, i);
        }
        for (i, s) in snapshot.reverse {
            let assignment = self.assign(s, i);
            if assignment.evicted.is_some() {
                cwarn!(evicted = ?assignment.evicted, "SlotTracker::restore: conflicting snapshot entry");
            }
        }
        cdebug!(
            forward = self.by_slot.len(),
            reverse = self.by_index.len(),
            "SlotTracker::restore"
        );
    }
}

/// A point-in-time copy of the tracker's `(index, slot)` pairs.
///
/// Restartable: iterate it as many times as needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignments<S, I> {
    pairs: Vec<(I, S)>,
}

impl<S, I> Assignments<S, I> {
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&I, &S)> + '_ {
        self.pairs.iter().map(|(i, s)| (i, s))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The same pairs in ascending index order.
    pub fn sorted(mut self) -> Self
    where
        I: Ord,
    {
        self.pairs.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }

    pub fn into_vec(self) -> Vec<(I, S)> {
        self.pairs
    }
}

impl<S, I> IntoIterator for Assignments<S, I> {
    type Item = (I, S);
    type IntoIter = alloc::vec::IntoIter<(I, S)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a, S, I> IntoIterator for &'a Assignments<S, I> {
    type Item = &'a (I, S);
    type IntoIter = core::slice::Iter<'a, (I, S)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
