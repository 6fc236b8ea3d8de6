use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

use cellpool::{SameIndexPolicy, SlotId};

use crate::Diagnostic;

/// Creates a brand-new container when the host asks for content without supplying one.
pub type CreateSlotCallback<S> = Arc<dyn Fn() -> S + Send + Sync>;

/// Receives item taps from the host, unmodified.
pub type OnItemTapCallback<I> = Arc<dyn Fn(&I) + Send + Sync>;

/// Receives "load more items" requests from the host, unmodified.
pub type OnLoadMoreItemsCallback = Arc<dyn Fn() + Send + Sync>;

/// Observes every recoverable diagnostic.
pub type OnDiagnosticCallback<S, I> = Arc<dyn Fn(&Diagnostic<S, I>) + Send + Sync>;

/// Configuration for [`crate::Recycler`].
///
/// Cheap to clone: closures are stored in `Arc`s.
pub struct RecyclerOptions<S, I> {
    pub create_slot: CreateSlotCallback<S>,

    /// Whether reassigning a slot to the index it already renders requests new content.
    pub same_index_policy: SameIndexPolicy,

    pub on_item_tap: Option<OnItemTapCallback<I>>,
    pub on_load_more_items: Option<OnLoadMoreItemsCallback>,
    pub on_diagnostic: Option<OnDiagnosticCallback<S, I>>,

    /// Expected pool size, used to pre-size the tracker and cache.
    pub initial_capacity: usize,
}

impl<S, I> Clone for RecyclerOptions<S, I> {
    fn clone(&self) -> Self {
        Self {
            create_slot: Arc::clone(&self.create_slot),
            same_index_policy: self.same_index_policy,
            on_item_tap: self.on_item_tap.clone(),
            on_load_more_items: self.on_load_more_items.clone(),
            on_diagnostic: self.on_diagnostic.clone(),
            initial_capacity: self.initial_capacity,
        }
    }
}

impl<I> RecyclerOptions<SlotId, I> {
    /// Options whose new containers are numbered `SlotId(0)`, `SlotId(1)`, ...
    pub fn new() -> Self {
        let next = Arc::new(AtomicU64::new(0));
        Self::with_slot_factory(move || SlotId::new(next.fetch_add(1, Ordering::Relaxed)))
    }
}

impl<I> Default for RecyclerOptions<SlotId, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> RecyclerOptions<S, I> {
    pub fn with_slot_factory(create_slot: impl Fn() -> S + Send + Sync + 'static) -> Self {
        Self {
            create_slot: Arc::new(create_slot),
            same_index_policy: SameIndexPolicy::default(),
            on_item_tap: None,
            on_load_more_items: None,
            on_diagnostic: None,
            initial_capacity: 16,
        }
    }

    pub fn with_same_index_policy(mut self, policy: SameIndexPolicy) -> Self {
        self.same_index_policy = policy;
        self
    }

    pub fn with_on_item_tap(mut self, f: Option<impl Fn(&I) + Send + Sync + 'static>) -> Self {
        self.on_item_tap = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_load_more_items(mut self, f: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.on_load_more_items = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_diagnostic(
        mut self,
        f: Option<impl Fn(&Diagnostic<S, I>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_diagnostic = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl<S, I> core::fmt::Debug for RecyclerOptions<S, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecyclerOptions")
            .field("same_index_policy", &self.same_index_policy)
            .field("on_item_tap", &self.on_item_tap.is_some())
            .field("on_load_more_items", &self.on_load_more_items.is_some())
            .field("on_diagnostic", &self.on_diagnostic.is_some())
            .field("initial_capacity", &self.initial_capacity)
            .finish_non_exhaustive()
    }
}
