//! Stamps engine-visible markers onto validated markup.

use crate::{
	config::Config,
	markup::{self, mark, role_of, Marker, Role},
};
use core::{cell::Cell, fmt};
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, NodeList};

/// Scopes engine events and capabilities to one root element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey(String);
impl InstanceKey {
	/// A key that's unique within this page.
	#[must_use]
	pub fn generate() -> Self {
		thread_local! {
			static COUNTER: Cell<u32> = Cell::new(0);
		}
		let count = COUNTER.with(|counter| {
			let count = counter.get();
			counter.set(count.wrapping_add(1));
			count
		});

		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let random = (js_sys::Math::random() * f64::from(u32::MAX)) as u32;

		Self(format!("swapy-{:08x}-{:x}", random, count))
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for InstanceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Tags `root` and everything below it, returning the freshly generated [`InstanceKey`].
///
/// Meant to run exactly once per instance, after [`validate`](`crate::validate::validate`) succeeded.
#[instrument]
pub fn tag_root(root: &Element, config: Config) -> InstanceKey {
	let key = InstanceKey::generate();

	mark(root, Marker::PluginKey(key.as_str()));
	mark(root, Marker::Plugin);
	mark(root, Marker::View(Role::Root));
	mark(root, Marker::Animation(config.animation.as_str()));
	if config.continuous_mode {
		mark(root, Marker::ContinuousMode);
	}

	let slots = select(root, markup::SLOT_SELECTOR);
	for slot in &slots {
		mark(slot, Marker::View(Role::Slot));
	}

	let items = select(root, markup::ITEM_SELECTOR);
	for item in &items {
		tag_item(item);
	}

	trace!("Tagged {} slot(s) and {} item(s) for {}.", slots.len(), items.len(), key);
	key
}

/// Tags one item along with its handle, text and exclude descendants.
pub fn tag_item(item: &Element) {
	let id = match markup::data_value(item, markup::ITEM) {
		Some(id) => id,
		None => {
			return warn!("Not tagging an item without id.");
		}
	};

	mark(item, Marker::View(Role::Item));
	mark(item, Marker::LayoutId(&id));

	match item.query_selector(markup::HANDLE_SELECTOR) {
		Ok(Some(handle)) => mark(&handle, Marker::View(Role::Handle)),
		Ok(None) => (),
		Err(error) => error!("Failed to query item handle: {:?}", error),
	}

	for text in select(item, markup::TEXT_SELECTOR) {
		mark(&text, Marker::LayoutPosition);
	}
	for excluded in select(item, markup::EXCLUDE_SELECTOR) {
		mark(&excluded, Marker::Ignore);
	}
}

/// Tags each item below `root` that isn't an item view yet. Returns how many were tagged.
///
/// Never touches the root markers, so this is safe to call any number of times.
#[instrument]
pub fn retag_untagged_items(root: &Element) -> usize {
	let mut count = 0;
	for item in select(root, markup::UNTAGGED_ITEM_SELECTOR) {
		debug_assert_ne!(role_of(&item), Some(Role::Item));
		tag_item(&item);
		if role_of(&item) == Some(Role::Item) {
			count += 1;
		}
	}
	trace!("Re-tagged {} item(s).", count);
	count
}

pub(crate) fn select(root: &Element, selector: &str) -> Vec<Element> {
	match root.query_selector_all(selector) {
		Ok(list) => elements(&list),
		Err(error) => {
			error!("Failed to query {:?}: {:?}", selector, error);
			Vec::new()
		}
	}
}

fn elements(list: &NodeList) -> Vec<Element> {
	(0..list.length()).filter_map(|i| list.get(i)).filter_map(|node| node.dyn_into::<Element>().ok()).collect()
}
