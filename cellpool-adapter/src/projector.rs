use alloc::vec::Vec;

use cellpool::{Assignments, ItemSource, SlotKey, SlotTracker};

/// Content produced for one live slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection<S, I, C> {
    pub slot: S,
    pub index: I,
    pub content: C,
}

/// Computes content for every slot that currently renders an index.
///
/// Walks the tracker's index → slot map, so evicted slots are never projected even though their
/// back-reference still names an index. Each live slot gets exactly one `item_to_content` call.
/// Output is in assignment (insertion) order; see [`project_sorted`] for index order.
///
/// Assignments whose index the source no longer provides are skipped.
pub fn project<'s, Src, S, C>(
    tracker: &SlotTracker<S, Src::Index>,
    source: &'s Src,
    item_to_content: impl FnMut(Src::Item<'s>, &S) -> C,
) -> Vec<Projection<S, Src::Index, C>>
where
    Src: ItemSource + ?Sized,
    S: SlotKey,
{
    project_assignments(
        tracker.current_assignments(),
        source,
        item_to_content,
        |_, _| {},
    )
}

/// Same as [`project`], but ordered by index.
pub fn project_sorted<'s, Src, S, C>(
    tracker: &SlotTracker<S, Src::Index>,
    source: &'s Src,
    item_to_content: impl FnMut(Src::Item<'s>, &S) -> C,
) -> Vec<Projection<S, Src::Index, C>>
where
    Src: ItemSource + ?Sized,
    S: SlotKey,
{
    project_assignments(
        tracker.current_assignments().sorted(),
        source,
        item_to_content,
        |_, _| {},
    )
}

pub(crate) fn project_assignments<'s, Src, S, C>(
    assignments: Assignments<S, Src::Index>,
    source: &'s Src,
    mut item_to_content: impl FnMut(Src::Item<'s>, &S) -> C,
    mut on_missing: impl FnMut(&S, &Src::Index),
) -> Vec<Projection<S, Src::Index, C>>
where
    Src: ItemSource + ?Sized,
    S: SlotKey,
{
    let mut out = Vec::with_capacity(assignments.len());
    for (index, slot) in assignments {
        let Some(item) = source.get(&index) else {
            atrace!(slot = ?slot, index = ?index, "project: item missing from source");
            on_missing(&slot, &index);
            continue;
        };
        let content = item_to_content(item, &slot);
        out.push(Projection {
            slot,
            index,
            content,
        });
    }
    out
}
