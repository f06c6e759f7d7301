//! Realizes the engine's slot assignments in the DOM.

use crate::{
	assignment::AssignmentMap,
	event::{EngineEvent, EventKind, InitEvent, SwapEvent},
	host::PluginHost,
	registry::Registries,
	tag::InstanceKey,
};
use core::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};
use web_sys::Element;

/// Called once per effective swap.
pub type SwapCallback = Rc<dyn Fn(&SwapEvent)>;

/// Where a [`Synchronizer`] is in its life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
	/// No map received yet.
	Uninitialized,
	/// Holding the baseline map from the init event, which the DOM already reflects.
	Initialized(AssignmentMap),
	/// Holding the last applied swap.
	Synced(AssignmentMap),
}
impl SyncState {
	#[must_use]
	pub fn previous_map(&self) -> Option<&AssignmentMap> {
		match self {
			SyncState::Uninitialized => None,
			SyncState::Initialized(map) | SyncState::Synced(map) => Some(map),
		}
	}
}

/// Owns the last applied [`AssignmentMap`] for one root element and reparents items when the engine delivers a different one.
///
/// The DOM is only mutated in reaction to a swap event, and only by moving already registered items.
pub struct Synchronizer {
	root: Element,
	key: InstanceKey,
	host: Rc<dyn PluginHost>,
	registries: RefCell<Registries>,
	state: RefCell<SyncState>,
	swap_callback: RefCell<Option<SwapCallback>>,
}
impl core::fmt::Debug for Synchronizer {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Synchronizer")
			.field("root", &self.root)
			.field("key", &self.key)
			.field("registries", &self.registries)
			.field("state", &self.state)
			.field("swap_callback", &self.swap_callback.borrow().is_some())
			.finish()
	}
}
impl Synchronizer {
	/// Builds the registries for `root`. Nothing is subscribed yet, see [`Synchronizer::subscribe`].
	#[must_use]
	pub fn new(root: Element, key: InstanceKey, host: Rc<dyn PluginHost>) -> Rc<Self> {
		let registries = Registries::build(&root);
		Rc::new(Self {
			root,
			key,
			host,
			registries: RefCell::new(registries),
			state: RefCell::new(SyncState::Uninitialized),
			swap_callback: RefCell::new(None),
		})
	}

	/// Routes this instance's init and swap events here.
	///
	/// The host only receives weak references, so it doesn't keep the synchronizer alive.
	pub fn subscribe(self: &Rc<Self>) {
		for &kind in &[EventKind::Init, EventKind::Swap] {
			let this: Weak<Self> = Rc::downgrade(self);
			self.host.subscribe(
				kind,
				&self.key,
				Rc::new(move |event: &EngineEvent| match this.upgrade() {
					Some(this) => this.handle(event),
					None => trace!("Dropping event for a discarded instance."),
				}),
			);
		}
	}

	#[must_use]
	pub fn key(&self) -> &InstanceKey {
		&self.key
	}

	#[must_use]
	pub fn root(&self) -> &Element {
		&self.root
	}

	#[must_use]
	pub fn state(&self) -> SyncState {
		self.state.borrow().clone()
	}

	#[must_use]
	pub fn previous_map(&self) -> Option<AssignmentMap> {
		self.state.borrow().previous_map().cloned()
	}

	/// Replaces the swap callback, if any.
	pub fn set_swap_callback(&self, callback: SwapCallback) {
		*self.swap_callback.borrow_mut() = Some(callback);
	}

	/// Forwards to the engine's enablement capability for this instance.
	#[instrument(skip(self), fields(key = %self.key))]
	pub fn set_enabled(&self, enabled: bool) {
		match self.host.enablement(&self.key) {
			Some(enablement) => enablement.set_enabled(enabled),
			None => error!("The plugin host has no enablement capability for this instance."),
		}
	}

	/// Tells the host to forget this instance. Events that still arrive are ignored.
	pub(crate) fn release(&self) {
		self.host.release(&self.key)
	}

	/// Rescans the root for slots and items.
	pub fn rebuild_registries(&self) {
		*self.registries.borrow_mut() = Registries::build(&self.root);
	}

	/// Read access to the current registries.
	pub fn with_registries<R>(&self, f: impl FnOnce(&Registries) -> R) -> R {
		f(&self.registries.borrow())
	}

	pub fn handle(&self, event: &EngineEvent) {
		match event {
			EngineEvent::Init(event) => self.on_init(event),
			EngineEvent::Swap(event) => {
				self.on_swap(event);
			}
		}
	}

	/// Stores the baseline verbatim. The DOM already looks like this.
	#[instrument(skip(self, event), fields(key = %self.key))]
	pub fn on_init(&self, event: &InitEvent) {
		let mut state = self.state.borrow_mut();
		if let SyncState::Synced(_) = *state {
			warn!("Received another init event after swaps were applied. Resetting the baseline.");
		}
		*state = SyncState::Initialized(event.map.clone());
	}

	/// Applies `event` unless it's equal to the stored map. Returns whether it was effective.
	///
	/// The swap callback runs after the DOM was updated and before the map is stored, with no borrows held.
	#[instrument(skip(self, event), fields(key = %self.key))]
	pub fn on_swap(&self, event: &SwapEvent) -> bool {
		if STATIC_MAX_LEVEL >= Level::WARN && !event.map.is_injective() {
			warn!("Swap map assigns an item to more than one slot.");
		}

		{
			let state = self.state.borrow();
			let previous = state.previous_map();
			if previous == Some(&event.map) {
				trace!("Suppressing swap equal to the stored map.");
				return false;
			}
			let moved = self.apply(previous, &event.map);
			trace!("Moved {} item(s).", moved);
		}

		let callback = self.swap_callback.borrow().clone();
		if let Some(callback) = callback {
			let span = trace_span!("swap_callback");
			let _enter = span.enter();
			callback(event);
		}

		*self.state.borrow_mut() = SyncState::Synced(event.map.clone());
		true
	}

	/// Moves each item of `candidate` whose slot changed relative to `previous` into its slot. Returns the number of items moved.
	///
	/// Empty targets and anything missing from the registries are skipped.
	#[must_use]
	pub fn apply(&self, previous: Option<&AssignmentMap>, candidate: &AssignmentMap) -> usize {
		let registries = self.registries.borrow();
		let mut moved = 0;
		for (slot_id, item_id) in candidate.changed_since(previous) {
			let span = if cfg!(feature = "dangerous-logging") {
				trace_span!("slot", id = slot_id.as_str(), item = ?item_id.map(|item| item.as_str()))
			} else {
				trace_span!("slot")
			};
			let _enter = span.enter();

			let item_id = match item_id {
				Some(item_id) => item_id,
				None => {
					trace!("Empty target. Leaving the slot as is.");
					continue;
				}
			};
			let (slot, item) = match (registries.slot(slot_id.as_str()), registries.item(item_id.as_str())) {
				(Some(slot), Some(item)) => (slot, item),
				(slot, _) => {
					trace!("Skipping unregistered {}.", if slot.is_none() { "slot" } else { "item" });
					continue;
				}
			};

			slot.set_text_content(None);
			match slot.append_child(item) {
				Ok(_) => moved += 1,
				Err(error) => error!("Failed to move item into slot: {:?}", error),
			}
		}
		moved
	}
}
