//! Typed events delivered by the drag engine.

use crate::assignment::{AssignmentMap, ItemId, SlotId};
use js_sys::{Map, Reflect};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	Init,
	Swap,
}
impl EventKind {
	/// The event type name used by JavaScript plugin runtimes.
	#[must_use]
	pub fn js_name(self) -> &'static str {
		match self {
			EventKind::Init => "SwapyPluginInitEvent",
			EventKind::Swap => "SwapEvent",
		}
	}
}

/// The arrangement the DOM already has when the engine starts up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitEvent {
	pub map: AssignmentMap,
}

/// A concluded swap gesture.
#[derive(Debug, Clone)]
pub struct SwapEvent {
	pub map: AssignmentMap,
	/// Whatever else the engine attached to the event. [`JsValue::UNDEFINED`] if nothing.
	pub metadata: JsValue,
}

#[derive(Debug, Clone)]
pub enum EngineEvent {
	Init(InitEvent),
	Swap(SwapEvent),
}
impl EngineEvent {
	#[must_use]
	pub fn kind(&self) -> EventKind {
		match self {
			EngineEvent::Init(_) => EventKind::Init,
			EngineEvent::Swap(_) => EventKind::Swap,
		}
	}

	/// Decodes a JavaScript event object `{ data: { map: Map<string, string | null> } }`, or the bare `data` object.
	///
	/// For swaps, the whole `data` object is kept as metadata.
	#[must_use]
	pub fn from_js(kind: EventKind, event: &JsValue) -> Option<Self> {
		let data = match Reflect::get(event, &JsValue::from_str("data")) {
			Ok(data) if data.is_object() => data,
			_ => event.clone(),
		};
		let map = Reflect::get(&data, &JsValue::from_str("map")).ok().and_then(|map| map.dyn_into::<Map>().ok());
		let map = match map {
			Some(map) => assignment_map_from_js(&map),
			None => {
				warn!("{} payload without a `map`; ignoring.", kind.js_name());
				return None;
			}
		};
		Some(match kind {
			EventKind::Init => EngineEvent::Init(InitEvent { map }),
			EventKind::Swap => EngineEvent::Swap(SwapEvent { map, metadata: data }),
		})
	}
}

/// Converts a JavaScript `Map<string, string | null>`.
///
/// Entries with a non-string or empty key are dropped. Non-string and empty values count as an empty slot.
#[must_use]
pub fn assignment_map_from_js(map: &Map) -> AssignmentMap {
	let mut assignment = AssignmentMap::new();
	map.for_each(&mut |value, key| {
		let slot = match key.as_string().and_then(SlotId::new) {
			Some(slot) => slot,
			None => return warn!("Dropping assignment entry with invalid slot key."),
		};
		assignment.insert(slot, value.as_string().and_then(ItemId::new));
	});
	assignment
}

/// Converts to a JavaScript `Map<string, string | null>`.
#[must_use]
pub fn assignment_map_to_js(assignment: &AssignmentMap) -> Map {
	let map = Map::new();
	for (slot, item) in assignment {
		map.set(&JsValue::from_str(slot.as_str()), &item.map_or(JsValue::NULL, |item| JsValue::from_str(item.as_str())));
	}
	map
}
