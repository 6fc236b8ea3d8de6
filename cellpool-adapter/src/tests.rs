use crate::*;

use cellpool::{ItemSource, PagedSource, ReconcileError, SameIndexPolicy, SlotId, SlotTracker};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<Diagnostic<SlotId, usize>>>>;

fn s(raw: u64) -> SlotId {
    SlotId::new(raw)
}

fn recycler_with_log(
    items: Vec<&'static str>,
    policy: SameIndexPolicy,
) -> (Recycler<Vec<&'static str>, SlotId, String>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let options = RecyclerOptions::new()
        .with_same_index_policy(policy)
        .with_on_diagnostic(Some({
            let log = Arc::clone(&log);
            move |d: &Diagnostic<SlotId, usize>| log.lock().unwrap().push(d.clone())
        }));
    (Recycler::new(items, options), log)
}

fn render(item: &&str, slot: &SlotId) -> String {
    format!("{item}@{}", slot.raw())
}

fn shown(p: &[Projection<SlotId, usize, String>]) -> Vec<(SlotId, String)> {
    p.iter().map(|p| (p.slot, p.content.clone())).collect()
}

#[test]
fn three_item_scenario_projects_live_slots_only() {
    let (mut r, log) = recycler_with_log(vec!["a", "b", "c"], SameIndexPolicy::Skip);

    let first = r.handle_recycling_notification(None, 0).unwrap();
    let slot1 = first.slot;
    assert!(first.first_sight);
    assert!(first.needs_content);
    assert_eq!(shown(&r.project(|item, _| item.to_string())), vec![(slot1, "a".to_string())]);

    let slot2 = r.handle_recycling_notification(None, 1).unwrap().slot;
    assert_ne!(slot1, slot2);
    let mut p = shown(&r.project(|item, _| item.to_string()));
    p.sort();
    assert_eq!(p, vec![(slot1, "a".to_string()), (slot2, "b".to_string())]);

    let moved = r.handle_recycling_notification(Some(slot1), 2).unwrap();
    assert!(!moved.first_sight);
    assert_eq!(moved.assignment.previous_index, Some(0));
    let p = r.project(|item, _| item.to_string());
    assert_eq!(
        shown(&p),
        vec![(slot2, "b".to_string()), (slot1, "c".to_string())]
    );
    assert!(p.iter().all(|p| p.index != 0));

    assert!(log.lock().unwrap().is_empty());
    let stats = r.stats();
    assert_eq!(stats.notifications, 3);
    assert_eq!(stats.first_sights, 2);
    assert_eq!(stats.reassignments, 1);
    assert_eq!(stats.projections, 3);
}

#[test]
fn out_of_bounds_indexes_are_rejected_without_mutation() {
    let (mut r, log) = recycler_with_log(vec!["a", "b", "c"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(7)), 1).unwrap();
    let before = r.tracker().snapshot();

    let err = r.handle_recycling_notification(Some(s(7)), 3).unwrap_err();
    assert_eq!(err, ReconcileError::OutOfBoundsIndex { index: 3, count: 3 });

    let err = r.handle_host_index(Some(s(7)), -1).unwrap_err();
    assert_eq!(err, ReconcileError::InvalidHostIndex { raw: -1, count: 3 });

    // Fresh requests are rejected before a container is created.
    r.handle_recycling_notification(None, 3).unwrap_err();

    assert_eq!(r.tracker().snapshot(), before);
    assert_eq!(r.stats().rejected, 3);
    assert_eq!(r.stats().notifications, 4);

    let created = r.handle_recycling_notification(None, 0).unwrap();
    assert_eq!(created.slot, s(0));

    let log = log.lock().unwrap();
    assert!(matches!(
        log[1],
        Diagnostic::Rejected {
            slot: Some(_),
            error: ReconcileError::OutOfBoundsIndex { index: 3, .. }
        }
    ));
    assert!(matches!(
        log[2],
        Diagnostic::Rejected {
            error: ReconcileError::InvalidHostIndex { raw: -1, .. },
            ..
        }
    ));
    assert!(matches!(log[3], Diagnostic::Rejected { slot: None, .. }));
}

#[test]
fn host_index_accepts_valid_positions() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    let done = r.handle_host_index(None, 1).unwrap();
    assert_eq!(done.index, 1);
    assert_eq!(r.tracker().lookup_slot_for_index(&1), Some(&done.slot));
}

#[test]
fn unknown_reused_slot_degrades_to_first_sight() {
    let (mut r, log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    let done = r.handle_recycling_notification(Some(s(40)), 1).unwrap();
    assert!(done.first_sight);
    assert_eq!(r.tracker().lookup_index_for_slot(&s(40)), Some(&1));
    assert_eq!(r.stats().inconsistent, 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec![Diagnostic::InconsistentSlotState {
            slot: s(40),
            requested: 1
        }]
    );
}

#[test]
fn fresh_slot_for_occupied_index_evicts_incumbent() {
    let (mut r, log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    let old = r.handle_recycling_notification(None, 0).unwrap().slot;
    r.project(render);
    assert!(r.content(&old).is_some());

    let new = r.handle_recycling_notification(None, 0).unwrap();
    assert_eq!(new.assignment.evicted, Some(old));
    assert_eq!(r.stats().evictions, 1);
    assert_eq!(r.stats().fresh_for_occupied, 1);
    assert!(r.content(&old).is_none());
    assert_eq!(
        *log.lock().unwrap(),
        vec![Diagnostic::FreshSlotForOccupiedIndex {
            index: 0,
            incumbent: old
        }]
    );

    let p = r.project(render);
    assert_eq!(shown(&p), vec![(new.slot, format!("a@{}", new.slot.raw()))]);
    // Documented staleness: the loser still believes it shows index 0.
    assert_eq!(r.tracker().lookup_index_for_slot(&old), Some(&0));
}

#[test]
fn projection_computes_once_per_live_slot() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b", "c", "d"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    r.handle_recycling_notification(Some(s(2)), 1).unwrap();
    r.handle_recycling_notification(Some(s(3)), 1).unwrap();
    r.handle_recycling_notification(Some(s(1)), 3).unwrap();

    let calls = AtomicUsize::new(0);
    let p = r.project(|item, slot| {
        calls.fetch_add(1, Ordering::Relaxed);
        render(item, slot)
    });
    assert_eq!(calls.load(Ordering::Relaxed), 2);
    assert_eq!(
        shown(&p),
        vec![
            (s(3), "b@3".to_string()),
            (s(1), "d@1".to_string()),
        ]
    );
    assert_eq!(r.content(&s(2)), None);
}

#[test]
fn same_index_skip_keeps_cached_content() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    let first = r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    assert!(first.needs_content);
    r.project(render);

    let again = r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    assert!(again.assignment.unchanged);
    assert!(!again.needs_content);
    assert_eq!(r.content(&s(1)).map(String::as_str), Some("b@1"));
    assert!(r.pending_tickets().is_empty());
}

#[test]
fn same_index_skip_does_not_short_circuit_projection() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    r.handle_recycling_notification(Some(s(2)), 1).unwrap();
    r.project(render);

    let again = r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    assert!(!again.needs_content);

    let calls = AtomicUsize::new(0);
    r.project(|item, slot| {
        calls.fetch_add(1, Ordering::Relaxed);
        render(item, slot)
    });
    assert_eq!(calls.load(Ordering::Relaxed), 2);
    assert_eq!(r.stats().projections, 2);
}

#[test]
fn counters_start_at_zero_without_diagnostics() {
    let (mut r, log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(None, 0).unwrap();
    r.handle_recycling_notification(None, 1).unwrap();
    r.project(render);

    let stats = r.stats();
    assert_eq!(stats.fresh_for_occupied, 0);
    assert_eq!(stats.missing_items, 0);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn same_index_skip_still_requests_missing_content() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    let again = r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    assert!(again.assignment.unchanged);
    assert!(again.needs_content);
}

#[test]
fn same_index_refresh_recomputes() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b"], SameIndexPolicy::Refresh);
    r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    r.project(render);

    let again = r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    assert!(again.assignment.unchanged);
    assert!(again.needs_content);
    assert_eq!(r.content(&s(1)), None);
    assert_eq!(r.pending_tickets().len(), 1);
}

#[test]
fn stale_async_results_are_discarded() {
    let (mut r, log) = recycler_with_log(vec!["a", "b", "c"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    r.handle_recycling_notification(Some(s(2)), 1).unwrap();
    log.lock().unwrap().clear();

    let tickets = r.pending_tickets();
    assert_eq!(tickets.len(), 2);
    let t1 = tickets[0].clone();
    let t2 = tickets[1].clone();
    assert_eq!((t1.slot, t1.index), (s(1), 0));

    // s1 is recycled to index 2 before its content for index 0 arrives.
    r.handle_recycling_notification(Some(s(1)), 2).unwrap();

    let err = r.commit(t1, "a".to_string()).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::StaleComputationDiscarded {
            slot: s(1),
            started_for: 0,
            current: Some(2),
        }
    );
    assert_eq!(r.content(&s(1)), None);
    assert_eq!(r.stats().stale_discarded, 1);
    assert_eq!(log.lock().unwrap().len(), 1);

    r.commit(t2, "b".to_string()).unwrap();
    assert_eq!(r.content(&s(2)).map(String::as_str), Some("b"));

    let pending = r.pending_tickets();
    assert_eq!(pending.len(), 1);
    assert_eq!((pending[0].slot, pending[0].index), (s(1), 2));
    let ticket = r.ticket(&s(1)).unwrap();
    assert_eq!(ticket, pending[0]);
    r.commit(ticket, "c".to_string()).unwrap();
    assert!(r.pending_tickets().is_empty());
}

#[test]
fn set_source_drops_unaddressable_assignments() {
    let (mut r, _log) = recycler_with_log(vec!["a", "b", "c"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    r.handle_recycling_notification(Some(s(2)), 2).unwrap();
    r.project(render);

    r.set_source(vec!["x", "y"]);
    assert_eq!(r.tracker().lookup_slot_for_index(&2), None);
    assert!(!r.tracker().is_live(&s(2)));
    assert!(r.cache().is_empty());

    let p = r.project(render);
    assert_eq!(shown(&p), vec![(s(1), "x@1".to_string())]);

    assert_eq!(r.prune_stale(), 1);
    assert!(!r.tracker().is_known(&s(2)));
}

#[test]
fn update_source_keeps_cached_content() {
    let source = PagedSource::new(2, |i| Some(format!("row{i}")));
    let mut r: Recycler<PagedSource<String>, SlotId, String> =
        Recycler::new(source, RecyclerOptions::new());
    r.handle_recycling_notification(Some(s(1)), 1).unwrap();
    r.project(|item, _| item);

    assert!(r.handle_recycling_notification(Some(s(2)), 4).is_err());
    r.update_source(|src| src.set_count(10));
    assert_eq!(r.content(&s(1)).map(String::as_str), Some("row1"));

    r.handle_recycling_notification(Some(s(2)), 4).unwrap();
    let p = r.project(|item, _| item);
    assert_eq!(p.len(), 2);
    assert_eq!(p[1].content, "row4");
}

#[test]
fn missing_items_are_reported_not_projected() {
    let source = PagedSource::new(3, |i| if i == 1 { None } else { Some(i) });
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = RecyclerOptions::new().with_on_diagnostic(Some({
        let log = Arc::clone(&log);
        move |d: &Diagnostic<SlotId, usize>| log.lock().unwrap().push(d.clone())
    }));
    let mut r: Recycler<PagedSource<usize>, SlotId, usize> = Recycler::new(source, options);
    r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    r.handle_recycling_notification(Some(s(2)), 1).unwrap();
    log.lock().unwrap().clear();

    let p = r.project(|item, _| item * 10);
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].content, 0);
    assert_eq!(r.stats().missing_items, 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec![Diagnostic::MissingItem {
            slot: s(2),
            index: 1
        }]
    );
}

#[test]
fn host_events_are_routed() {
    let taps = Arc::new(Mutex::new(Vec::new()));
    let more = Arc::new(AtomicUsize::new(0));
    let options = RecyclerOptions::new()
        .with_on_item_tap(Some({
            let taps = Arc::clone(&taps);
            move |i: &usize| taps.lock().unwrap().push(*i)
        }))
        .with_on_load_more_items(Some({
            let more = Arc::clone(&more);
            move || {
                more.fetch_add(1, Ordering::Relaxed);
            }
        }));
    let mut r: Recycler<Vec<u32>, SlotId, u32> = Recycler::new(vec![1, 2, 3], options);

    let done = r
        .dispatch(HostEvent::SlotNeedsContent {
            slot: None,
            index: 2,
        })
        .unwrap()
        .unwrap();
    assert_eq!(done.index, 2);

    assert_eq!(r.dispatch(HostEvent::ItemTapped { index: 2 }), Ok(None));
    assert_eq!(r.dispatch(HostEvent::LoadMoreItems), Ok(None));
    assert_eq!(*taps.lock().unwrap(), vec![2]);
    assert_eq!(more.load(Ordering::Relaxed), 1);

    r.dispatch(HostEvent::SlotDestroyed { slot: done.slot }).unwrap();
    assert!(!r.tracker().is_known(&done.slot));
    assert!(r.project(|item, _| *item).is_empty());

    assert!(
        r.dispatch(HostEvent::SlotNeedsContent {
            slot: None,
            index: 9
        })
        .is_err()
    );
}

#[test]
fn release_slot_clears_content() {
    let (mut r, _log) = recycler_with_log(vec!["a"], SameIndexPolicy::Skip);
    r.handle_recycling_notification(Some(s(1)), 0).unwrap();
    r.project(render);
    assert_eq!(r.release_slot(&s(1)), Some(0));
    assert_eq!(r.content(&s(1)), None);
    assert_eq!(r.release_slot(&s(1)), None);
}

#[test]
fn free_projector_orders_by_assignment_or_index() {
    let mut t = SlotTracker::new();
    t.assign(s(1), 2usize);
    t.assign(s(2), 0);
    t.assign(s(3), 1);
    t.assign(s(4), 1);
    let items = ["zero", "one", "two"];

    let p = project(&t, &items[..], |item, _| item.len());
    let order: Vec<_> = p.iter().map(|p| (p.index, p.slot)).collect();
    assert_eq!(order, vec![(2, s(1)), (0, s(2)), (1, s(4))]);

    let p = project_sorted(&t, &items[..], |item, slot| format!("{item}:{}", slot.raw()));
    let content: Vec<_> = p.into_iter().map(|p| p.content).collect();
    assert_eq!(content, vec!["zero:2", "one:4", "two:1"]);
}

#[test]
fn cache_commit_checks_tickets() {
    let mut t = SlotTracker::new();
    t.assign(s(1), 0usize);
    let mut cache: ContentCache<SlotId, usize, &str> = ContentCache::new();

    let ticket = t.ticket(&s(1)).unwrap();
    cache.commit(&t, ticket.clone(), "zero").unwrap();
    assert!(cache.is_fresh(&t, &s(1)));

    t.assign(s(2), 0);
    assert!(!cache.is_fresh(&t, &s(1)));
    assert!(cache.commit(&t, ticket, "again").is_err());
    assert_eq!(cache.get(&s(1)), Some(&"zero"));
    assert_eq!(cache.retain_fresh(&t), 1);
    assert!(cache.is_empty());
}

#[test]
fn random_recycling_keeps_projection_consistent() {
    let mut seed = 0x1234_5678_u64;
    let mut next = |bound: u64| {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (seed >> 33) % bound
    };

    let items: Vec<u64> = (0..30).collect();
    let mut r: Recycler<Vec<u64>, SlotId, u64> = Recycler::new(items, RecyclerOptions::new());
    for step in 0..500 {
        let slot = match next(6) {
            0 => None,
            n => Some(s(100 + n)),
        };
        let index = next(34) as i64 - 2;
        let _ = r.handle_host_index(slot, index);

        if step % 7 == 0 {
            let p = r.project(|item, _| *item);
            let slots: HashSet<_> = p.iter().map(|p| p.slot).collect();
            let indexes: HashSet<_> = p.iter().map(|p| p.index).collect();
            assert_eq!(slots.len(), p.len());
            assert_eq!(indexes.len(), p.len());
            assert_eq!(p.len(), r.tracker().reverse_len());
            for p in &p {
                assert_eq!(p.content, p.index as u64);
                assert!(r.tracker().is_live(&p.slot));
                assert!(ItemSource::contains(r.source(), &p.index));
            }
        }
    }
    let stats = r.stats();
    assert_eq!(stats.notifications, 500);
    assert!(stats.rejected > 0);
    assert_eq!(
        stats.first_sights + stats.reassignments + stats.rejected,
        stats.notifications
    );
}
