//! Recycling event handling and render projection for the `cellpool` crate.
//!
//! `cellpool` owns the slot ⇄ index bookkeeping. This crate wires it to a host list widget:
//!
//! - [`Recycler`] consumes "slot needs content for index I" notifications, validates them
//!   against the item source and updates the tracker.
//! - [`project`] turns the tracker's current assignments into per-slot content.
//! - [`ContentCache`] holds materialized content and refuses results that arrive after their
//!   slot moved on.
//!
//! This crate is framework-agnostic: slots and content are whatever the host uses.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod diagnostics;
mod host;
mod options;
mod projector;
mod recycler;

#[cfg(test)]
mod tests;

pub use cache::ContentCache;
pub use diagnostics::{Diagnostic, RecyclerStats};
pub use host::HostEvent;
pub use options::{
    CreateSlotCallback, OnDiagnosticCallback, OnItemTapCallback, OnLoadMoreItemsCallback,
    RecyclerOptions,
};
pub use projector::{Projection, project, project_sorted};
pub use recycler::{Reconciled, Recycler};
