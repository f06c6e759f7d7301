//! Keeps slotted DOM items in sync with the slot assignments an external drag engine decides on.
//!
//! Markup declares slots (`data-swapy-slot="…"`) holding at most one item (`data-swapy-item="…"`) each.
//! [`create_swapy`] validates that structure, tags it for the engine, and then reparents items whenever
//! the engine reports a swap that differs from the last one applied.

#![doc(html_root_url = "https://docs.rs/slot-swap-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod assignment;
pub mod config;
mod error;
pub mod event;
pub mod host;
pub mod js_host;
pub mod markup;
pub mod registry;
mod swapy;
pub mod sync;
pub mod tag;
pub mod validate;
pub mod watch;

pub use assignment::{AssignmentMap, ItemId, SlotId};
pub use config::{Animation, Config};
pub use error::Error;
pub use event::{EngineEvent, EventKind, InitEvent, SwapEvent};
pub use host::{Dispatcher, Enablement, PluginHost, PluginRegistration};
pub use swapy::{create_swapy, Swapy};
pub use tag::InstanceKey;
