//! Attribute names read from authored markup and written for the drag engine.
//!
//! The engine only ever sees the `data-vel-*` markers, so those are written through [`mark`] with a typed [`Marker`].
//! Authored `data-swapy-*` attributes are only read.

use tracing::error;
use web_sys::Element;

/// Marks a slot container. The value is the slot id.
pub const SLOT: &str = "data-swapy-slot";
/// Marks an item. The value is the item id.
pub const ITEM: &str = "data-swapy-item";
/// Marks the drag handle inside an item.
pub const HANDLE: &str = "data-swapy-handle";
/// Marks text whose layout position the engine should track.
pub const TEXT: &str = "data-swapy-text";
/// Marks a subtree the engine should ignore.
pub const EXCLUDE: &str = "data-swapy-exclude";

pub(crate) const SLOT_SELECTOR: &str = "[data-swapy-slot]";
pub(crate) const ITEM_SELECTOR: &str = "[data-swapy-item]";
pub(crate) const HANDLE_SELECTOR: &str = "[data-swapy-handle]";
pub(crate) const TEXT_SELECTOR: &str = "[data-swapy-text]";
pub(crate) const EXCLUDE_SELECTOR: &str = "[data-swapy-exclude]";
pub(crate) const UNTAGGED_ITEM_SELECTOR: &str = "[data-swapy-item]:not([data-vel-view])";

/// Plugin name the engine knows this adapter by.
pub const PLUGIN_NAME: &str = "Swapy";

pub const PLUGIN_KEY: &str = "data-vel-plugin-key";
pub const PLUGIN: &str = "data-vel-plugin";
pub const VIEW: &str = "data-vel-view";
pub const CONFIG_ANIMATION: &str = "data-vel-data-config-animation";
pub const CONFIG_CONTINUOUS_MODE: &str = "data-vel-data-config-continuous-mode";
pub const LAYOUT_ID: &str = "data-vel-layout-id";
pub const LAYOUT_POSITION: &str = "data-vel-layout-position";
pub const IGNORE: &str = "data-vel-ignore";

/// The view an element plays for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
	Root,
	Slot,
	Item,
	Handle,
}
impl Role {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Role::Root => "root",
			Role::Slot => "slot",
			Role::Item => "item",
			Role::Handle => "handle",
		}
	}

	#[must_use]
	pub fn parse(value: &str) -> Option<Self> {
		Some(match value {
			"root" => Role::Root,
			"slot" => Role::Slot,
			"item" => Role::Item,
			"handle" => Role::Handle,
			_ => return None,
		})
	}
}

/// One engine-facing marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
	PluginKey(&'a str),
	Plugin,
	View(Role),
	Animation(&'a str),
	ContinuousMode,
	LayoutId(&'a str),
	/// Presence-only.
	LayoutPosition,
	/// Presence-only.
	Ignore,
}
impl<'a> Marker<'a> {
	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Marker::PluginKey(_) => PLUGIN_KEY,
			Marker::Plugin => PLUGIN,
			Marker::View(_) => VIEW,
			Marker::Animation(_) => CONFIG_ANIMATION,
			Marker::ContinuousMode => CONFIG_CONTINUOUS_MODE,
			Marker::LayoutId(_) => LAYOUT_ID,
			Marker::LayoutPosition => LAYOUT_POSITION,
			Marker::Ignore => IGNORE,
		}
	}

	#[must_use]
	pub fn value(self) -> &'a str {
		match self {
			Marker::PluginKey(value) | Marker::Animation(value) | Marker::LayoutId(value) => value,
			Marker::Plugin => PLUGIN_NAME,
			Marker::View(role) => role.as_str(),
			Marker::ContinuousMode => "true",
			Marker::LayoutPosition | Marker::Ignore => "",
		}
	}
}

/// Writes `marker` onto `element`, logging instead of failing if the DOM rejects it.
pub fn mark(element: &Element, marker: Marker<'_>) {
	if let Err(error) = element.set_attribute(marker.name(), marker.value()) {
		error!("Failed to set {}: {:?}", marker.name(), error)
	}
}

/// The [`Role`] this element was tagged with, if any.
#[must_use]
pub fn role_of(element: &Element) -> Option<Role> {
	element.get_attribute(VIEW).as_deref().and_then(Role::parse)
}

/// Reads an authored attribute, treating an empty value as absent.
#[must_use]
pub fn data_value(element: &Element, name: &str) -> Option<String> {
	element.get_attribute(name).filter(|value| !value.is_empty())
}
