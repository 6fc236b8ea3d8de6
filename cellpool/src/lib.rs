//! Slot/item reconciliation for virtualized lists that recycle their cells.
//!
//! For the recycling event handler and render projection, see the `cellpool-adapter` crate.
//!
//! A virtualized list widget owns a small pool of reusable rendering containers ("slots") and
//! repeatedly asks for a slot to be repurposed to show a different item of a logical, possibly
//! unbounded, sequence. This crate keeps the bidirectional mapping between slots and item
//! indexes consistent while those requests arrive out of order:
//!
//! - [`SlotTracker`] answers "which index does this slot render?" and "which slot renders this
//!   index?" in O(1), and applies the "last assignment wins" update protocol.
//! - [`ItemSource`] normalizes plain lists, keyed maps and lazy/paged providers.
//! - [`ContentTicket`] lets asynchronous content computations detect that their slot moved on.
//!
//! It is UI-agnostic: slots are opaque handles supplied by the host.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod key;
mod snapshot;
mod source;
mod tracker;
mod types;


pub use error::ReconcileError;
pub use key::{IndexKey, SlotKey};
pub use snapshot::TrackerSnapshot;
pub use source::{ItemSource, Items, PagedSource};
pub use tracker::{Assignments, SlotTracker};
pub use types::{Assignment, ContentTicket, SameIndexPolicy, SlotId};
