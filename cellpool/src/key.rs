use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

/// Slot → index back-references.
pub(crate) type ForwardMap<S, I> = hashbrown::HashMap<S, I, DefaultHashBuilder>;

/// Index → slot, in insertion order.
pub(crate) type ReverseMap<I, S> = IndexMap<I, S, DefaultHashBuilder>;

/// Identity of a reusable rendering container.
///
/// Slots are compared by identity only; the tracker never looks inside them.
pub trait SlotKey: Hash + Eq + Clone + Debug {}
impl<T: Hash + Eq + Clone + Debug> SlotKey for T {}

/// A logical position (or opaque key) into the item sequence.
pub trait IndexKey: Hash + Eq + Ord + Clone + Debug {}
impl<T: Hash + Eq + Ord + Clone + Debug> IndexKey for T {}
