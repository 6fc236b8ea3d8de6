use core::fmt;

/// A ready-made slot identity for hosts that do not have their own handle type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId(pub u64);

impl SlotId {
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// The outcome of [`crate::SlotTracker::assign`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment<S, I> {
    /// The index the slot held before this call (`None` on first sight).
    ///
    /// This is the slot's back-reference, so it may name an index the slot had already lost to
    /// another slot.
    pub previous_index: Option<I>,
    /// The slot that rendered the requested index before this call, if it was a different one.
    pub evicted: Option<S>,
    /// `true` when the slot was already the live renderer of the requested index.
    pub unchanged: bool,
}

impl<S, I> Assignment<S, I> {
    pub fn is_first_sight(&self) -> bool {
        self.previous_index.is_none()
    }
}

/// What to do when a slot is reassigned to the index it is already rendering.
///
/// The policy decides `needs_content` for a recycling notification and which slots count as
/// pending for asynchronous content. A full projection pass still recomputes every live slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SameIndexPolicy {
    /// Keep the slot's current content; no recomputation is requested.
    #[default]
    Skip,
    /// Treat the notification like any other reassignment and recompute content.
    Refresh,
}

/// The `(slot, index)` pair an asynchronous content computation was started for.
///
/// Pass it along with the work and check it with [`crate::SlotTracker::is_current`] before
/// applying the result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentTicket<S, I> {
    pub slot: S,
    pub index: I,
}
