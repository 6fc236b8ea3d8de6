use cellpool::ReconcileError;

/// A recoverable condition observed while handling host notifications.
///
/// Diagnostics never stop the handler; they are reported through
/// [`crate::RecyclerOptions::on_diagnostic`] and counted in [`RecyclerStats`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic<S, I> {
    /// A notification or content commit was refused. `slot` is `None` when the host supplied
    /// no container and none was created.
    Rejected {
        slot: Option<S>,
        error: ReconcileError<S, I>,
    },
    /// The host handed back a container it claims is reused, but the tracker has never seen it.
    /// It is handled as a first sight.
    InconsistentSlotState { slot: S, requested: I },
    /// The host asked for a brand-new container for an index that already has one.
    FreshSlotForOccupiedIndex { index: I, incumbent: S },
    /// A live assignment names an index the item source no longer provides.
    MissingItem { slot: S, index: I },
}

/// Diagnostic counters.
///
/// These are plain counters, not part of the reconciliation state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecyclerStats {
    /// Recycling notifications received, including rejected ones.
    pub notifications: u64,
    pub first_sights: u64,
    pub reassignments: u64,
    /// Slots that lost their index to another slot.
    pub evictions: u64,
    pub rejected: u64,
    pub inconsistent: u64,
    /// New containers requested for an index that already had one.
    pub fresh_for_occupied: u64,
    /// Live assignments skipped by a projection because the source lacked the item.
    pub missing_items: u64,
    pub stale_discarded: u64,
    pub projections: u64,
}
