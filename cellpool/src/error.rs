/// Recoverable reconciliation failures.
///
/// None of these are fatal: the offending notification or commit is dropped and the maps are
/// left exactly as they were.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReconcileError<S, I> {
    #[error("index {index:?} is not addressable by the item source (count = {count})")]
    OutOfBoundsIndex { index: I, count: usize },

    #[error("host index {raw} is not a valid position (count = {count})")]
    InvalidHostIndex { raw: i64, count: usize },

    #[error(
        "content for {slot:?} at index {started_for:?} was discarded; the slot now renders {current:?}"
    )]
    StaleComputationDiscarded {
        slot: S,
        started_for: I,
        current: Option<I>,
    },
}
