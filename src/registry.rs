use crate::{
	assignment::{ItemId, SlotId},
	markup,
	tag::select,
};
use hashbrown::HashMap;
use tracing::{instrument, trace, warn};
use web_sys::Element;

/// Slot id → slot element and item id → item element, as found in the DOM.
///
/// Rebuilt from scratch rather than patched. Duplicate ids resolve to the element that comes last in document order.
#[derive(Debug, Default)]
pub struct Registries {
	slots: HashMap<SlotId, Element>,
	items: HashMap<ItemId, Element>,
}
impl Registries {
	#[must_use]
	#[instrument]
	pub fn build(root: &Element) -> Self {
		let slots = collect(root, markup::SLOT_SELECTOR, markup::SLOT, SlotId::new);
		let items = collect(root, markup::ITEM_SELECTOR, markup::ITEM, ItemId::new);
		trace!("Registered {} slot(s) and {} item(s).", slots.len(), items.len());
		Self { slots, items }
	}

	#[must_use]
	pub fn slot(&self, id: &str) -> Option<&Element> {
		self.slots.get(id)
	}

	#[must_use]
	pub fn item(&self, id: &str) -> Option<&Element> {
		self.items.get(id)
	}

	pub fn slot_ids(&self) -> impl Iterator<Item = &SlotId> {
		self.slots.keys()
	}

	#[must_use]
	pub fn slot_count(&self) -> usize {
		self.slots.len()
	}

	#[must_use]
	pub fn item_count(&self) -> usize {
		self.items.len()
	}
}

fn collect<K: core::hash::Hash + Eq + core::fmt::Display>(root: &Element, selector: &str, attribute: &str, new_id: fn(String) -> Option<K>) -> HashMap<K, Element> {
	let mut map = HashMap::new();
	for element in select(root, selector) {
		let id = match markup::data_value(&element, attribute).and_then(new_id) {
			Some(id) => id,
			None => continue,
		};
		if map.contains_key(&id) {
			if cfg!(feature = "dangerous-logging") {
				warn!("Duplicate {}=\"{}\"; the later element wins.", attribute, id)
			} else {
				warn!("Duplicate {}; the later element wins.", attribute)
			}
		}
		map.insert(id, element);
	}
	map
}
