use crate::validate::Violations;
use core::fmt;
use wasm_bindgen::JsValue;

/// Why [`create_swapy`](`crate::create_swapy`) refused to construct an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// The root element wasn't found.
	MissingRoot,
	/// The markup below the root is not a legal slot/item structure.
	///
	/// Each violation has already been logged individually by the time this is returned.
	InvalidStructure(Violations),
}
impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::MissingRoot => f.write_str("Cannot create a Swapy instance because the element you provided does not exist on the page!"),
			Error::InvalidStructure(violations) => write!(
				f,
				"Cannot create a Swapy instance because your HTML structure is invalid. Fix all above errors and then try again! ({} error(s): {})",
				violations.len(),
				violations
			),
		}
	}
}
impl std::error::Error for Error {}

impl From<Error> for JsValue {
	fn from(error: Error) -> Self {
		js_sys::Error::new(&error.to_string()).into()
	}
}
