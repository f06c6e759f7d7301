//! The narrow seam towards the plugin runtime that hosts the drag engine.

use crate::{
	config::Animation,
	event::{EngineEvent, EventKind},
	tag::InstanceKey,
};
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{instrument, trace, trace_span};

/// Receives engine events for one instance.
pub type Handler = Rc<dyn Fn(&EngineEvent)>;

/// What the engine needs to know to drive one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRegistration {
	pub key: InstanceKey,
	pub animation: Animation,
	pub continuous_mode: bool,
}

/// Toggles whether the engine reacts to drags for one instance.
pub trait Enablement {
	fn set_enabled(&self, enabled: bool);
}

/// A plugin runtime, as far as this crate is concerned.
pub trait PluginHost {
	/// Installs a plugin instance. Called once per instance, before any subscription.
	fn install(&self, registration: PluginRegistration);

	/// Routes events of `kind` scoped to `key` to `handler` from now on.
	fn subscribe(&self, kind: EventKind, key: &InstanceKey, handler: Handler);

	/// The enablement capability of an installed instance.
	fn enablement(&self, key: &InstanceKey) -> Option<Rc<dyn Enablement>>;

	/// Forgets the instance `key` and its subscriptions. Called once when its [`Swapy`](crate::Swapy) is dropped.
	///
	/// Hosts that can't unsubscribe may keep the handlers, which then do nothing.
	fn release(&self, key: &InstanceKey) {
		let _ = key;
	}
}

#[derive(Debug)]
struct EnabledFlag(Cell<bool>);
impl Enablement for EnabledFlag {
	fn set_enabled(&self, enabled: bool) {
		self.0.set(enabled)
	}
}

/// An in-process [`PluginHost`]: a subscription registry keyed by event kind and instance.
///
/// Whatever computes the swaps calls [`Dispatcher::dispatch`] to deliver events.
///
/// Registrations and handlers are removed again when their instance is released.
#[derive(Default)]
pub struct Dispatcher {
	installed: RefCell<HashMap<InstanceKey, (PluginRegistration, Rc<EnabledFlag>)>>,
	handlers: RefCell<HashMap<(EventKind, InstanceKey), Vec<Handler>>>,
}
impl core::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("installed", &self.installed.borrow().len())
			.field("subscriptions", &self.handlers.borrow().values().map(Vec::len).sum::<usize>())
			.finish()
	}
}
impl Dispatcher {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Delivers `event` to every handler subscribed to its kind under `key`. Returns how many handlers ran.
	///
	/// Handlers may subscribe or dispatch re-entrantly.
	#[instrument(skip(event))]
	pub fn dispatch(&self, key: &InstanceKey, event: &EngineEvent) -> usize {
		let handlers = match self.handlers.borrow().get(&(event.kind(), key.clone())) {
			Some(handlers) => handlers.clone(),
			None => {
				trace!("No subscribers.");
				return 0;
			}
		};
		for handler in &handlers {
			let span = trace_span!("handler", kind = ?event.kind());
			let _enter = span.enter();
			handler(event);
		}
		handlers.len()
	}

	#[must_use]
	pub fn registration(&self, key: &InstanceKey) -> Option<PluginRegistration> {
		self.installed.borrow().get(key).map(|(registration, _)| registration.clone())
	}

	/// [`None`] for unknown instances. Instances start out enabled.
	#[must_use]
	pub fn is_enabled(&self, key: &InstanceKey) -> Option<bool> {
		self.installed.borrow().get(key).map(|(_, flag)| flag.0.get())
	}
}
impl PluginHost for Dispatcher {
	#[instrument]
	fn install(&self, registration: PluginRegistration) {
		let flag = Rc::new(EnabledFlag(Cell::new(true)));
		self.installed.borrow_mut().insert(registration.key.clone(), (registration, flag));
	}

	#[instrument(skip(handler))]
	fn subscribe(&self, kind: EventKind, key: &InstanceKey, handler: Handler) {
		self.handlers.borrow_mut().entry((kind, key.clone())).or_default().push(handler)
	}

	fn enablement(&self, key: &InstanceKey) -> Option<Rc<dyn Enablement>> {
		self.installed.borrow().get(key).map(|(_, flag)| flag.clone() as Rc<dyn Enablement>)
	}

	#[instrument]
	fn release(&self, key: &InstanceKey) {
		if self.installed.borrow_mut().remove(key).is_none() {
			trace!("Instance wasn't installed.");
		}
		self.handlers.borrow_mut().retain(|(_, subscribed), _| subscribed != key);
	}
}
