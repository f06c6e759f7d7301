use core::{fmt, str::FromStr};
use js_sys::Reflect;
use tracing::warn;
use wasm_bindgen::JsValue;

/// How the engine animates items into their new slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
	Dynamic,
	Spring,
	None,
}
impl Default for Animation {
	fn default() -> Self {
		Animation::Dynamic
	}
}
impl Animation {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Animation::Dynamic => "dynamic",
			Animation::Spring => "spring",
			Animation::None => "none",
		}
	}
}
impl fmt::Display for Animation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Animation {
	type Err = UnknownAnimation;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"dynamic" => Ok(Animation::Dynamic),
			"spring" => Ok(Animation::Spring),
			"none" => Ok(Animation::None),
			_ => Err(UnknownAnimation(s.to_owned())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnimation(pub String);
impl fmt::Display for UnknownAnimation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown animation {:?}, expected one of \"dynamic\", \"spring\" or \"none\"", self.0)
	}
}
impl std::error::Error for UnknownAnimation {}

/// Options stamped onto the root element for the engine to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
	pub animation: Animation,
	/// Whether the engine swaps continuously while dragging rather than only on drop.
	pub continuous_mode: bool,
}
impl Default for Config {
	fn default() -> Self {
		Self {
			animation: Animation::default(),
			continuous_mode: true,
		}
	}
}
impl Config {
	#[must_use]
	pub fn with_animation(self, animation: Animation) -> Self {
		Self { animation, ..self }
	}

	#[must_use]
	pub fn with_continuous_mode(self, continuous_mode: bool) -> Self {
		Self { continuous_mode, ..self }
	}

	/// Reads `{ animation?, continuousMode? }` from a JavaScript options object.
	///
	/// Missing or ill-typed fields fall back to their defaults.
	#[must_use]
	pub fn from_js(options: &JsValue) -> Self {
		let mut config = Self::default();
		if options.is_undefined() || options.is_null() {
			return config;
		}

		match Reflect::get(options, &JsValue::from_str("animation")) {
			Ok(value) if value.is_undefined() => (),
			Ok(value) => match value.as_string().as_deref().map(str::parse) {
				Some(Ok(animation)) => config.animation = animation,
				Some(Err(error)) => warn!("Ignoring animation option: {}", error),
				None => warn!("Ignoring non-string animation option."),
			},
			Err(error) => warn!("Could not read animation option: {:?}", error),
		}

		match Reflect::get(options, &JsValue::from_str("continuousMode")) {
			Ok(value) if value.is_undefined() => (),
			Ok(value) => match value.as_bool() {
				Some(continuous_mode) => config.continuous_mode = continuous_mode,
				None => warn!("Ignoring non-boolean continuousMode option."),
			},
			Err(error) => warn!("Could not read continuousMode option: {:?}", error),
		}

		config
	}
}
