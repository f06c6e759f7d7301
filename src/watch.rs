use crate::{sync::Synchronizer, tag::retag_untagged_items};
use js_sys::Array;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord};

/// Watches the root's subtree for inserted items, tags them and refreshes the registries.
///
/// Moving already tagged items around (as the [`Synchronizer`] does) never causes a rebuild.
///
/// Dropping the watcher disconnects the observer.
pub struct LiveTreeWatcher {
	observer: MutationObserver,
	synchronizer: Rc<Synchronizer>,
	_callback: Closure<dyn FnMut(Array, MutationObserver)>,
}
impl core::fmt::Debug for LiveTreeWatcher {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("LiveTreeWatcher").field("observer", &self.observer).finish()
	}
}
impl LiveTreeWatcher {
	/// Starts observing `synchronizer`'s root.
	///
	/// # Errors
	///
	/// Iff the browser refuses to create or attach the observer.
	#[instrument]
	pub fn observe(synchronizer: Rc<Synchronizer>) -> Result<Self, JsValue> {
		let callback = {
			let synchronizer = synchronizer.clone();
			Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
				let span = trace_span!("mutation_observer", records = records.length());
				let _enter = span.enter();
				process(&synchronizer, &records);
			}) as Box<dyn FnMut(Array, MutationObserver)>)
		};

		let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
		let mut options = MutationObserverInit::new();
		options.child_list(true).subtree(true);
		observer.observe_with_options(synchronizer.root(), &options)?;

		Ok(Self {
			observer,
			synchronizer,
			_callback: callback,
		})
	}

	/// Processes pending mutation records right away instead of waiting for the observer's turn.
	///
	/// Returns whether the registries were rebuilt.
	#[instrument]
	pub fn flush(&self) -> bool {
		process(&self.synchronizer, &self.observer.take_records())
	}
}
impl Drop for LiveTreeWatcher {
	fn drop(&mut self) {
		self.observer.disconnect();
		trace!("Disconnected mutation observer.");
	}
}

fn process(synchronizer: &Synchronizer, records: &Array) -> bool {
	let has_child_list_change = records.iter().any(|record| match record.dyn_into::<MutationRecord>() {
		Ok(record) => record.type_() == "childList",
		Err(record) => {
			error!("Expected `MutationRecord` but found {:?}.", record);
			false
		}
	});
	if !has_child_list_change {
		trace!("No child list changes.");
		return false;
	}

	if retag_untagged_items(synchronizer.root()) == 0 {
		trace!("No new items.");
		return false;
	}
	synchronizer.rebuild_registries();
	true
}
