/// Notifications a host list widget delivers, one at a time, on its UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent<S, I> {
    /// A container must show the item at `index`. `slot` is `None` when the widget has no
    /// container to reuse and expects one to be created.
    SlotNeedsContent { slot: Option<S>, index: I },
    /// Passed through to [`crate::RecyclerOptions::on_item_tap`].
    ItemTapped { index: I },
    /// Passed through to [`crate::RecyclerOptions::on_load_more_items`].
    LoadMoreItems,
    /// The widget destroyed a container.
    SlotDestroyed { slot: S },
}
