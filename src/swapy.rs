use crate::{
	assignment::AssignmentMap,
	config::Config,
	error::Error,
	event::SwapEvent,
	host::{PluginHost, PluginRegistration},
	sync::{SyncState, Synchronizer},
	tag::{tag_root, InstanceKey},
	validate::validate,
	watch::LiveTreeWatcher,
};
use std::rc::Rc;
use tracing::{error, info, instrument, trace};
use web_sys::Element;

/// One root element kept in sync with its engine session.
///
/// Dropping this stops watching for inserted items and releases the instance on its host.
/// Events the host still delivers afterwards are ignored.
#[derive(Debug)]
pub struct Swapy {
	synchronizer: Rc<Synchronizer>,
	watcher: Option<LiveTreeWatcher>,
}

/// Validates and tags `root`, installs an engine plugin instance on `host` and starts syncing.
///
/// # Errors
///
/// [`Error::MissingRoot`] if `root` is [`None`], [`Error::InvalidStructure`] if the markup below it isn't a valid slot/item structure.
/// Nothing is tagged or installed in either case.
#[instrument(skip(host))]
pub fn create_swapy(root: Option<Element>, config: Config, host: Rc<dyn PluginHost>) -> Result<Swapy, Error> {
	let root = root.ok_or(Error::MissingRoot)?;
	validate(&root).map_err(Error::InvalidStructure)?;

	let key = tag_root(&root, config);
	host.install(PluginRegistration {
		key: key.clone(),
		animation: config.animation,
		continuous_mode: config.continuous_mode,
	});

	let synchronizer = Synchronizer::new(root, key, host);
	synchronizer.subscribe();

	let watcher = match LiveTreeWatcher::observe(synchronizer.clone()) {
		Ok(watcher) => Some(watcher),
		Err(error) => {
			error!("Failed to watch for inserted items, so they won't be swappable: {:?}", error);
			None
		}
	};

	info!("Created instance {}.", synchronizer.key());
	Ok(Swapy { synchronizer, watcher })
}

impl Swapy {
	/// Replaces the callback that's invoked once per effective swap.
	pub fn on_swap(&self, callback: impl 'static + Fn(&SwapEvent)) {
		self.synchronizer.set_swap_callback(Rc::new(callback))
	}

	/// Enables or disables dragging through the engine.
	pub fn enable(&self, enabled: bool) {
		self.synchronizer.set_enabled(enabled)
	}

	#[must_use]
	pub fn instance_key(&self) -> &InstanceKey {
		self.synchronizer.key()
	}

	#[must_use]
	pub fn root(&self) -> &Element {
		self.synchronizer.root()
	}

	/// The last map received from the engine, if any.
	#[must_use]
	pub fn previous_map(&self) -> Option<AssignmentMap> {
		self.synchronizer.previous_map()
	}

	#[must_use]
	pub fn state(&self) -> SyncState {
		self.synchronizer.state()
	}

	#[must_use]
	pub fn synchronizer(&self) -> &Rc<Synchronizer> {
		&self.synchronizer
	}

	/// Handles pending DOM mutations immediately. Returns whether new items were registered.
	pub fn flush_mutations(&self) -> bool {
		self.watcher.as_ref().map_or(false, LiveTreeWatcher::flush)
	}
}
impl Drop for Swapy {
	fn drop(&mut self) {
		self.synchronizer.release();
		trace!("Released instance {}.", self.synchronizer.key());
	}
}
