use alloc::vec::Vec;
use core::fmt;

use cellpool::{
    Assignment, ContentTicket, ItemSource, ReconcileError, SameIndexPolicy, SlotKey, SlotTracker,
};

use crate::projector::project_assignments;
use crate::{ContentCache, Diagnostic, HostEvent, Projection, RecyclerOptions, RecyclerStats};

/// The result of a handled recycling notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled<S, I> {
    /// The slot that now renders `index` (created if the host supplied none).
    pub slot: S,
    pub index: I,
    pub assignment: Assignment<S, I>,
    /// `true` when the tracker had never seen the slot before.
    pub first_sight: bool,
    /// Whether content has to be (re)computed for the slot.
    pub needs_content: bool,
}

/// Handles host recycling notifications and projects content for live slots.
///
/// This type does not hold any UI objects besides the opaque slot handles. The embedding layer
/// drives it by calling:
/// - `handle_recycling_notification` (or `dispatch`) when the widget asks for content
/// - `project` to materialize content for every live slot
/// - `release_slot` when the widget destroys a container
///
/// Everything runs on the caller's thread; notifications are expected one at a time.
pub struct Recycler<Src: ItemSource, S, C> {
    tracker: SlotTracker<S, Src::Index>,
    source: Src,
    cache: ContentCache<S, Src::Index, C>,
    options: RecyclerOptions<S, Src::Index>,
    stats: RecyclerStats,
}

impl<Src, S, C> Recycler<Src, S, C>
where
    Src: ItemSource,
    S: SlotKey,
{
    pub fn new(source: Src, options: RecyclerOptions<S, Src::Index>) -> Self {
        adebug!(
            count = source.count(),
            capacity = options.initial_capacity,
            "Recycler::new"
        );
        Self {
            tracker: SlotTracker::with_capacity(options.initial_capacity),
            cache: ContentCache::with_capacity(options.initial_capacity),
            source,
            options,
            stats: RecyclerStats::default(),
        }
    }

    pub fn options(&self) -> &RecyclerOptions<S, Src::Index> {
        &self.options
    }

    pub fn set_options(&mut self, options: RecyclerOptions<S, Src::Index>) {
        self.options = options;
    }

    pub fn tracker(&self) -> &SlotTracker<S, Src::Index> {
        &self.tracker
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    pub fn cache(&self) -> &ContentCache<S, Src::Index, C> {
        &self.cache
    }

    pub fn content(&self, slot: &S) -> Option<&C> {
        self.cache.get(slot)
    }

    pub fn stats(&self) -> RecyclerStats {
        self.stats
    }

    /// Replaces the item source. All cached content is dropped, and assignments the new source
    /// cannot address are removed (their slots become stale).
    pub fn set_source(&mut self, source: Src) {
        self.source = source;
        self.cache.clear();
        self.revalidate();
    }

    /// Mutates the item source in place (e.g. after more pages were loaded).
    ///
    /// Cached content is kept for assignments that stay addressable.
    pub fn update_source(&mut self, f: impl FnOnce(&mut Src)) {
        f(&mut self.source);
        self.revalidate();
    }

    fn revalidate(&mut self) {
        let source = &self.source;
        let dropped = self.tracker.retain_indices(|i| source.contains(i));
        for (_, slot) in &dropped {
            self.cache.invalidate(slot);
        }
        adebug!(
            count = self.source.count(),
            dropped = dropped.len(),
            "Recycler::revalidate"
        );
    }

    /// Reconciles "`slot` needs content for `index`".
    ///
    /// `slot` is `None` when the host has no container to reuse; one is created with
    /// [`RecyclerOptions::create_slot`]. An index the source cannot address is rejected without
    /// touching the tracker (and without creating a container).
    pub fn handle_recycling_notification(
        &mut self,
        slot: Option<S>,
        index: Src::Index,
    ) -> Result<Reconciled<S, Src::Index>, ReconcileError<S, Src::Index>> {
        self.stats.notifications += 1;

        if !self.source.contains(&index) {
            let error = ReconcileError::OutOfBoundsIndex {
                index,
                count: self.source.count(),
            };
            return Err(self.reject(slot, error));
        }

        let (slot, reused) = match slot {
            Some(slot) => (slot, true),
            None => ((self.options.create_slot)(), false),
        };

        if reused && !self.tracker.is_known(&slot) {
            self.stats.inconsistent += 1;
            self.report(Diagnostic::InconsistentSlotState {
                slot: slot.clone(),
                requested: index.clone(),
            });
        }
        if !reused {
            if let Some(incumbent) = self.tracker.lookup_slot_for_index(&index) {
                self.stats.fresh_for_occupied += 1;
                let diagnostic = Diagnostic::FreshSlotForOccupiedIndex {
                    index: index.clone(),
                    incumbent: incumbent.clone(),
                };
                self.report(diagnostic);
            }
        }

        let assignment = self.tracker.assign(slot.clone(), index.clone());
        let first_sight = assignment.is_first_sight();
        if first_sight {
            self.stats.first_sights += 1;
        } else {
            self.stats.reassignments += 1;
        }
        if let Some(evicted) = &assignment.evicted {
            self.stats.evictions += 1;
            self.cache.invalidate(evicted);
        }

        let keep = assignment.unchanged
            && self.options.same_index_policy == SameIndexPolicy::Skip
            && self.cache.is_fresh(&self.tracker, &slot);
        if !keep {
            self.cache.invalidate(&slot);
        }

        atrace!(
            slot = ?slot,
            index = ?index,
            first_sight,
            needs_content = !keep,
            "Recycler::handle_recycling_notification"
        );
        Ok(Reconciled {
            slot,
            index,
            assignment,
            first_sight,
            needs_content: !keep,
        })
    }

    /// Routes a host event: content requests are reconciled, taps and load-more requests are
    /// passed through unmodified, destroyed containers are released.
    pub fn dispatch(
        &mut self,
        event: HostEvent<S, Src::Index>,
    ) -> Result<Option<Reconciled<S, Src::Index>>, ReconcileError<S, Src::Index>> {
        match event {
            HostEvent::SlotNeedsContent { slot, index } => {
                self.handle_recycling_notification(slot, index).map(Some)
            }
            HostEvent::ItemTapped { index } => {
                if let Some(cb) = &self.options.on_item_tap {
                    cb(&index);
                }
                Ok(None)
            }
            HostEvent::LoadMoreItems => {
                if let Some(cb) = &self.options.on_load_more_items {
                    cb();
                }
                Ok(None)
            }
            HostEvent::SlotDestroyed { slot } => {
                self.release_slot(&slot);
                Ok(None)
            }
        }
    }

    /// Forgets a container the host destroyed. Returns the index it was rendering, if live.
    pub fn release_slot(&mut self, slot: &S) -> Option<Src::Index> {
        self.cache.invalidate(slot);
        self.tracker.release_slot(slot)
    }

    /// Drops back-references (and cached content) of slots that were evicted and never
    /// reassigned.
    pub fn prune_stale(&mut self) -> usize {
        let stale: Vec<S> = self.tracker.stale_slots().map(|(s, _)| s.clone()).collect();
        for slot in &stale {
            self.cache.invalidate(slot);
        }
        self.tracker.prune_stale()
    }

    /// Computes content for every live slot and refreshes the cache with it.
    ///
    /// Each live slot gets exactly one `item_to_content` call; evicted slots are skipped.
    /// [`SameIndexPolicy`] does not apply here: slots with fresh cached content are recomputed
    /// too. Use [`Self::pending_tickets`] to compute only what is missing.
    /// Assignments whose item the source no longer provides are reported as
    /// [`Diagnostic::MissingItem`] and left out.
    pub fn project<'a, F>(&'a mut self, item_to_content: F) -> Vec<Projection<S, Src::Index, C>>
    where
        C: Clone,
        F: FnMut(Src::Item<'a>, &S) -> C,
    {
        let Self {
            tracker,
            source,
            cache,
            options,
            stats,
        } = self;
        let source: &'a Src = source;
        stats.projections += 1;

        let mut missing = Vec::new();
        let out = project_assignments(
            tracker.current_assignments(),
            source,
            item_to_content,
            |s, i| missing.push((s.clone(), i.clone())),
        );

        for p in &out {
            cache.insert(p.slot.clone(), p.index.clone(), p.content.clone());
        }
        for (slot, index) in missing {
            stats.missing_items += 1;
            cache.invalidate(&slot);
            report(options, Diagnostic::MissingItem { slot, index });
        }
        out
    }

    /// Tickets for live slots without fresh cached content, in assignment order.
    ///
    /// Use these to start asynchronous content computations and hand the results back through
    /// [`Self::commit`].
    pub fn pending_tickets(&self) -> Vec<ContentTicket<S, Src::Index>> {
        self.tracker
            .current_assignments()
            .into_iter()
            .filter(|(_, slot)| !self.cache.is_fresh(&self.tracker, slot))
            .map(|(index, slot)| ContentTicket { slot, index })
            .collect()
    }

    pub fn ticket(&self, slot: &S) -> Option<ContentTicket<S, Src::Index>> {
        self.tracker.ticket(slot)
    }

    /// Applies the result of an asynchronous content computation.
    ///
    /// If the slot was reassigned or evicted after `ticket` was taken, the content is dropped
    /// and `StaleComputationDiscarded` is returned.
    pub fn commit(
        &mut self,
        ticket: ContentTicket<S, Src::Index>,
        content: C,
    ) -> Result<(), ReconcileError<S, Src::Index>> {
        let slot = ticket.slot.clone();
        match self.cache.commit(&self.tracker, ticket, content) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.stats.stale_discarded += 1;
                report(
                    &self.options,
                    Diagnostic::Rejected {
                        slot: Some(slot),
                        error: error.clone(),
                    },
                );
                Err(error)
            }
        }
    }

    fn reject(
        &mut self,
        slot: Option<S>,
        error: ReconcileError<S, Src::Index>,
    ) -> ReconcileError<S, Src::Index> {
        self.stats.rejected += 1;
        self.report(Diagnostic::Rejected {
            slot,
            error: error.clone(),
        });
        error
    }

    fn report(&self, diagnostic: Diagnostic<S, Src::Index>) {
        report(&self.options, diagnostic);
    }
}

impl<Src, S, C> Recycler<Src, S, C>
where
    Src: ItemSource<Index = usize>,
    S: SlotKey,
{
    /// Same as [`Self::handle_recycling_notification`], for hosts that report positions as
    /// signed integers. Negative or oversized values are rejected without touching the tracker.
    pub fn handle_host_index(
        &mut self,
        slot: Option<S>,
        raw: i64,
    ) -> Result<Reconciled<S, usize>, ReconcileError<S, usize>> {
        match usize::try_from(raw) {
            Ok(index) => self.handle_recycling_notification(slot, index),
            Err(_) => {
                self.stats.notifications += 1;
                let error = ReconcileError::InvalidHostIndex {
                    raw,
                    count: self.source.count(),
                };
                Err(self.reject(slot, error))
            }
        }
    }
}

fn report<S: SlotKey, I: fmt::Debug>(options: &RecyclerOptions<S, I>, diagnostic: Diagnostic<S, I>) {
    awarn!(diagnostic = ?diagnostic, "recoverable reconciliation condition");
    if let Some(cb) = &options.on_diagnostic {
        cb(&diagnostic);
    }
}

impl<Src, S, C> fmt::Debug for Recycler<Src, S, C>
where
    Src: ItemSource,
    S: SlotKey,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("tracker", &self.tracker)
            .field("source_count", &self.source.count())
            .field("cached", &self.cache.len())
            .field("options", &self.options)
            .field("stats", &self.stats)
            .finish()
    }
}
