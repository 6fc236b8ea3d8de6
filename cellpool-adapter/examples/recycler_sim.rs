// Example: a simulated host widget driving a recycler with a small cell pool.
use cellpool::SlotId;
use cellpool_adapter::{HostEvent, Recycler, RecyclerOptions};

fn main() {
    let items: Vec<String> = (0..100).map(|i| format!("message #{i}")).collect();
    let options = RecyclerOptions::new()
        .with_initial_capacity(4)
        .with_on_item_tap(Some(|i: &usize| println!("tapped row {i}")))
        .with_on_load_more_items(Some(|| println!("host wants more rows")))
        .with_on_diagnostic(Some(|d: &cellpool_adapter::Diagnostic<SlotId, usize>| {
            println!("diagnostic: {d:?}")
        }));
    let mut r: Recycler<Vec<String>, SlotId, String> = Recycler::new(items, options);

    // The widget fills four cells, then scrolls: each new row reuses the oldest cell.
    let mut pool = Vec::new();
    for row in 0..4 {
        let done = r.handle_recycling_notification(None, row).unwrap();
        pool.push(done.slot);
    }
    for row in 4..10 {
        let slot = pool[row % 4];
        r.dispatch(HostEvent::SlotNeedsContent {
            slot: Some(slot),
            index: row,
        })
        .unwrap();
    }

    // A bogus position from the host is rejected without disturbing the pool.
    let _ = r.handle_host_index(Some(pool[0]), -1);

    for p in r.project(|item, slot| format!("[{}] {item}", slot.raw())) {
        println!("row {:>3}: {}", p.index, p.content);
    }

    r.dispatch(HostEvent::ItemTapped { index: 7 }).unwrap();
    r.dispatch(HostEvent::LoadMoreItems).unwrap();
    println!("{:?}", r.stats());
}
