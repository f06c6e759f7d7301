//! Slot and item identities, and the slot → item assignment the engine negotiates.

use core::{borrow::Borrow, fmt, iter::FromIterator};
use hashbrown::{hash_map, HashMap};

macro_rules! id_type {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub struct $name(String);
		impl $name {
			/// Returns [`None`] for an empty `id`.
			#[must_use]
			pub fn new(id: impl Into<String>) -> Option<Self> {
				let id = id.into();
				if id.is_empty() {
					None
				} else {
					Some(Self(id))
				}
			}

			#[must_use]
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

id_type!(
	/// Non-empty slot identity, unique among the slots of one instance.
	SlotId
);
id_type!(
	/// Non-empty item identity, unique among the items of one instance.
	ItemId
);

/// Which item (if any) occupies each slot.
///
/// Equality compares the key → value pairs only. Key order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentMap(HashMap<SlotId, Option<ItemId>>);
impl AssignmentMap {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Assigns `item` to `slot`, returning the previous occupant entry.
	pub fn insert(&mut self, slot: SlotId, item: Option<ItemId>) -> Option<Option<ItemId>> {
		self.0.insert(slot, item)
	}

	/// [`None`] if the slot is unknown, `Some(None)` if it's known but empty.
	#[must_use]
	pub fn get(&self, slot: &str) -> Option<Option<&ItemId>> {
		self.0.get(slot).map(Option::as_ref)
	}

	/// The slot currently holding `item`.
	#[must_use]
	pub fn slot_of(&self, item: &str) -> Option<&SlotId> {
		self.0.iter().find(|(_, occupant)| occupant.as_ref().map(ItemId::as_str) == Some(item)).map(|(slot, _)| slot)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> Iter<'_> {
		Iter(self.0.iter())
	}

	/// Entries of `self` whose occupant differs from `previous`.
	///
	/// Slots unknown to `previous` always count as changed.
	pub fn changed_since<'a>(&'a self, previous: Option<&'a AssignmentMap>) -> impl 'a + Iterator<Item = (&'a SlotId, Option<&'a ItemId>)> {
		self.iter().filter(move |&(slot, item)| match previous {
			Some(previous) => previous.get(slot.as_str()) != Some(item),
			None => true,
		})
	}

	/// Whether no item occupies more than one slot.
	#[must_use]
	pub fn is_injective(&self) -> bool {
		let mut seen = hashbrown::HashSet::with_capacity(self.0.len());
		self.0.values().flatten().all(|item| seen.insert(item))
	}
}

impl FromIterator<(SlotId, Option<ItemId>)> for AssignmentMap {
	fn from_iter<T: IntoIterator<Item = (SlotId, Option<ItemId>)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a AssignmentMap {
	type Item = (&'a SlotId, Option<&'a ItemId>);
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

pub struct Iter<'a>(hash_map::Iter<'a, SlotId, Option<ItemId>>);
impl<'a> Iterator for Iter<'a> {
	type Item = (&'a SlotId, Option<&'a ItemId>);

	fn next(&mut self) -> Option<Self::Item> {
		self.0.next().map(|(slot, item)| (slot, item.as_ref()))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}
