// Example: recycling three cells across a longer list, out of visual order.
use cellpool::{SlotId, SlotTracker};

fn main() {
    let mut t: SlotTracker<SlotId, usize> = SlotTracker::with_capacity(3);

    // Initial fill: three cells for the first three rows.
    for i in 0..3u64 {
        t.assign(SlotId::new(i), i as usize);
    }

    // Scrolling down: the top cell is recycled for row 3.
    let a = t.assign(SlotId::new(0), 3);
    println!("recycled {:?}: {:?} -> 3", SlotId::new(0), a.previous_index);

    // Out-of-order notification: cell 2 claims row 3 as well; cell 0 is evicted.
    let a = t.assign(SlotId::new(2), 3);
    println!("row 3 evicted {:?}", a.evicted);
    println!(
        "cell 0 back-reference={:?} live={:?}",
        t.lookup_index_for_slot(&SlotId::new(0)),
        t.live_index_for_slot(&SlotId::new(0))
    );

    for (index, slot) in t.current_assignments().sorted() {
        println!("row {index} -> {slot:?}");
    }

    println!("pruned {} stale back-references", t.prune_stale());
}
