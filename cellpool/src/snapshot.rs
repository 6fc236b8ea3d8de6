use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// A serializable copy of both tracker maps.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerSnapshot<S, I> {
    /// Slot → index back-references, including stale ones. Unordered.
    pub forward: Vec<(S, I)>,
    /// Index → slot pairs in insertion order.
    pub reverse: Vec<(I, S)>,
}

impl<S, I> Default for TrackerSnapshot<S, I> {
    fn default() -> Self {
        Self {
            forward: Vec::new(),
            reverse: Vec::new(),
        }
    }
}

impl<S: Hash + Eq, I: Hash + Eq> TrackerSnapshot<S, I> {
    /// Slots present in `forward` but not rendering their recorded index.
    pub fn stale_slots(&self) -> impl Iterator<Item = &S> + '_ {
        let live: HashSet<(&I, &S)> = self.reverse.iter().map(|(i, s)| (i, s)).collect();
        self.forward
            .iter()
            .filter(move |(s, i)| !live.contains(&(i, s)))
            .map(|(s, _)| s)
    }
}
