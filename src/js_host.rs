//! [`PluginHost`] on top of a JavaScript plugin runtime.

use crate::{
	event::{EngineEvent, EventKind},
	host::{Enablement, Handler, PluginHost, PluginRegistration},
	tag::InstanceKey,
};
use core::cell::RefCell;
use hashbrown::HashMap;
use js_sys::{Object, Reflect};
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};

#[wasm_bindgen]
extern "C" {
	/// A JavaScript plugin runtime exposing `addPlugin(options)`,
	/// `onPluginEvent(eventType, pluginKey, handler)` and `setPluginEnabled(pluginKey, enabled)`.
	#[derive(Debug, Clone)]
	pub type JsPluginHost;

	#[wasm_bindgen(method, catch, js_name = addPlugin)]
	fn add_plugin(this: &JsPluginHost, options: &JsValue) -> Result<(), JsValue>;

	#[wasm_bindgen(method, catch, js_name = onPluginEvent)]
	fn on_plugin_event(this: &JsPluginHost, event_type: &str, plugin_key: &str, handler: &js_sys::Function) -> Result<(), JsValue>;

	#[wasm_bindgen(method, catch, js_name = setPluginEnabled)]
	fn set_plugin_enabled(this: &JsPluginHost, plugin_key: &str, enabled: bool) -> Result<(), JsValue>;
}

/// Adapts a [`JsPluginHost`].
///
/// Event closures handed to JavaScript live as long as this adapter, since the runtime offers no way to unsubscribe.
/// Released instances keep theirs, which then ignore events. JavaScript calling them after the adapter is dropped throws.
pub struct JsHost {
	host: JsPluginHost,
	closures: RefCell<HashMap<InstanceKey, Vec<Closure<dyn Fn(JsValue)>>>>,
}
impl core::fmt::Debug for JsHost {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("JsHost")
			.field("host", &self.host)
			.field("closures", &self.closures.borrow().values().map(Vec::len).sum::<usize>())
			.finish()
	}
}
impl JsHost {
	#[must_use]
	pub fn new(host: JsPluginHost) -> Self {
		Self {
			host,
			closures: RefCell::new(HashMap::new()),
		}
	}
}

#[must_use]
fn registration_to_js(registration: &PluginRegistration) -> JsValue {
	let options = Object::new();
	for (name, value) in [
		("pluginKey", JsValue::from_str(registration.key.as_str())),
		("animation", JsValue::from_str(registration.animation.as_str())),
		("continuousMode", JsValue::from_bool(registration.continuous_mode)),
	]
	.iter()
	{
		if let Err(error) = Reflect::set(&options, &JsValue::from_str(name), value) {
			error!("Failed to set plugin option {}: {:?}", name, error)
		}
	}
	options.into()
}

impl PluginHost for JsHost {
	#[instrument]
	fn install(&self, registration: PluginRegistration) {
		if let Err(error) = self.host.add_plugin(&registration_to_js(&registration)) {
			error!("Failed to install plugin: {:?}", error)
		}
	}

	#[instrument(skip(handler))]
	fn subscribe(&self, kind: EventKind, key: &InstanceKey, handler: Handler) {
		let closure = Closure::wrap(Box::new(move |event: JsValue| {
			let span = trace_span!("js_event", kind = kind.js_name());
			let _enter = span.enter();
			match EngineEvent::from_js(kind, &event) {
				Some(event) => handler(&event),
				None => trace!("Dropped undecodable event."),
			}
		}) as Box<dyn Fn(JsValue)>);

		if let Err(error) = self.host.on_plugin_event(kind.js_name(), key.as_str(), closure.as_ref().unchecked_ref()) {
			return error!("Failed to subscribe to {}: {:?}", kind.js_name(), error);
		}
		self.closures.borrow_mut().entry(key.clone()).or_default().push(closure);
	}

	fn enablement(&self, key: &InstanceKey) -> Option<Rc<dyn Enablement>> {
		Some(Rc::new(JsEnablement {
			host: self.host.clone(),
			key: key.clone(),
		}))
	}
}

#[derive(Debug)]
struct JsEnablement {
	host: JsPluginHost,
	key: InstanceKey,
}
impl Enablement for JsEnablement {
	fn set_enabled(&self, enabled: bool) {
		if let Err(error) = self.host.set_plugin_enabled(self.key.as_str(), enabled) {
			error!("Failed to set enablement: {:?}", error)
		}
	}
}
