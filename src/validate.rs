//! Checks that markup forms a legal slot/item structure before anything is tagged.

use crate::markup::{self, SLOT_SELECTOR};
use core::fmt;
use tracing::{error, instrument, trace};
use wasm_bindgen::JsCast;
use web_sys::Element;

/// One way in which markup breaks the slot/item contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
	/// No descendant of the root declares itself a slot.
	NoSlots,
	/// A slot without (or with an empty) slot id.
	MissingSlotId { index: usize },
	/// A slot with more than one element child.
	MultipleItems { slot: Option<String>, count: u32 },
	/// A slot whose only element child has no item id.
	UnlabeledItem { slot: Option<String> },
}
impl Violation {
	/// Names the broken rule without mentioning any ids.
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			Violation::NoSlots => "no slots",
			Violation::MissingSlotId { .. } => "slot without slot id",
			Violation::MultipleItems { .. } => "slot with multiple elements",
			Violation::UnlabeledItem { .. } => "item without item id",
		}
	}
}
impl fmt::Display for Violation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fn slot_name(slot: &Option<String>) -> &str {
			slot.as_deref().unwrap_or("<unnamed>")
		}

		match self {
			Violation::NoSlots => write!(f, "there are no slots (`{}`) inside the root element", markup::SLOT),
			Violation::MissingSlotId { index } => write!(f, "slot #{} does not have a slot id in `{}`", index, markup::SLOT),
			Violation::MultipleItems { slot, count } => write!(f, "slot {:?} contains {} elements but can only contain one item", slot_name(slot), count),
			Violation::UnlabeledItem { slot } => write!(f, "the item in slot {:?} does not have an item id in `{}`", slot_name(slot), markup::ITEM),
		}
	}
}

/// All [`Violation`]s found in one pass, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);
impl Violations {
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl fmt::Display for Violations {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, violation) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str("; ")?;
			}
			violation.fmt(f)?;
		}
		Ok(())
	}
}

/// Checks every rule over the whole subtree below `root`.
///
/// Each violation is logged as an error when found, and none of them stops the scan.
///
/// # Errors
///
/// Iff at least one violation was found.
#[instrument]
pub fn validate(root: &Element) -> Result<(), Violations> {
	let mut violations = Vec::new();
	let mut report = |violation: Violation| {
		if cfg!(feature = "dangerous-logging") {
			error!("Invalid slot/item markup: {}", violation)
		} else {
			error!("Invalid slot/item markup: {}", violation.kind())
		}
		violations.push(violation);
	};

	let slots = match root.query_selector_all(SLOT_SELECTOR) {
		Ok(slots) => slots,
		Err(error) => {
			error!("Failed to query slots: {:?}", error);
			report(Violation::NoSlots);
			return Err(Violations(violations));
		}
	};

	if slots.length() == 0 {
		report(Violation::NoSlots);
	}

	for index in 0..slots.length() {
		let slot = match slots.get(index).and_then(|node| node.dyn_into::<Element>().ok()) {
			Some(slot) => slot,
			None => continue,
		};

		let slot_id = markup::data_value(&slot, markup::SLOT);
		if slot_id.is_none() {
			report(Violation::MissingSlotId { index: index as usize });
		}

		match slot.child_element_count() {
			0 => trace!("Empty slot."),
			1 => {
				let labeled = slot.first_element_child().map_or(false, |item| markup::data_value(&item, markup::ITEM).is_some());
				if !labeled {
					report(Violation::UnlabeledItem { slot: slot_id });
				}
			}
			count => report(Violation::MultipleItems { slot: slot_id, count }),
		}
	}

	if violations.is_empty() {
		trace!("Validated {} slot(s).", slots.length());
		Ok(())
	} else {
		Err(Violations(violations))
	}
}
