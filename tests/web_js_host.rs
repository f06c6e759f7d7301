use js_sys::{Function, Map, Object, Reflect};
use slot_swap_dom::{
	create_swapy,
	event::assignment_map_from_js,
	js_host::{JsHost, JsPluginHost},
	AssignmentMap, Animation, Config, EngineEvent, EventKind, ItemId, SlotId,
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

use web_fixture_::{mount, occupant, LEFT_RIGHT};

fn js_map(entries: &[(&str, Option<&str>)]) -> Map {
	let map = Map::new();
	for &(slot, item) in entries {
		map.set(&slot.into(), &item.map_or(JsValue::NULL, JsValue::from_str));
	}
	map
}

fn object(entries: &[(&str, JsValue)]) -> JsValue {
	let object = Object::new();
	for (name, value) in entries {
		Reflect::set(&object, &JsValue::from_str(name), value).unwrap();
	}
	object.into()
}

fn map(entries: &[(&str, Option<&str>)]) -> AssignmentMap {
	entries.iter().map(|&(slot, item)| (SlotId::new(slot).unwrap(), item.and_then(ItemId::new))).collect()
}

/// Calls made into a JavaScript plugin runtime.
#[derive(Default)]
struct Recorded {
	options: Vec<JsValue>,
	subscriptions: Vec<(String, String, Function)>,
	enabled: Vec<(String, bool)>,
}

/// A plain JavaScript object with `addPlugin`, `onPluginEvent` and `setPluginEnabled` methods that record their arguments.
fn recording_host() -> (JsPluginHost, Rc<RefCell<Recorded>>) {
	let recorded = Rc::new(RefCell::new(Recorded::default()));
	let host = Object::new();

	let add_plugin = Closure::wrap(Box::new({
		let recorded = recorded.clone();
		move |options: JsValue| recorded.borrow_mut().options.push(options)
	}) as Box<dyn Fn(JsValue)>);
	let on_plugin_event = Closure::wrap(Box::new({
		let recorded = recorded.clone();
		move |event_type: String, plugin_key: String, handler: Function| recorded.borrow_mut().subscriptions.push((event_type, plugin_key, handler))
	}) as Box<dyn Fn(String, String, Function)>);
	let set_plugin_enabled = Closure::wrap(Box::new({
		let recorded = recorded.clone();
		move |plugin_key: String, enabled: bool| recorded.borrow_mut().enabled.push((plugin_key, enabled))
	}) as Box<dyn Fn(String, bool)>);

	Reflect::set(&host, &JsValue::from_str("addPlugin"), add_plugin.as_ref()).unwrap();
	Reflect::set(&host, &JsValue::from_str("onPluginEvent"), on_plugin_event.as_ref()).unwrap();
	Reflect::set(&host, &JsValue::from_str("setPluginEnabled"), set_plugin_enabled.as_ref()).unwrap();
	add_plugin.forget();
	on_plugin_event.forget();
	set_plugin_enabled.forget();

	(host.unchecked_into(), recorded)
}

fn subscribed_handler(recorded: &RefCell<Recorded>, event_type: &str) -> Function {
	recorded
		.borrow()
		.subscriptions
		.iter()
		.find(|(subscribed, _, _)| subscribed.as_str() == event_type)
		.map(|(_, _, handler)| handler.clone())
		.unwrap_or_else(|| panic!("No handler for {}", event_type))
}

fn event(entries: &[(&str, Option<&str>)]) -> JsValue {
	object(&[("data", object(&[("map", js_map(entries).into())]))])
}

#[wasm_bindgen_test]
fn js_host_installs_and_subscribes() {
	let (plugin_host, recorded) = recording_host();
	let swapy = create_swapy(
		Some(mount(LEFT_RIGHT)),
		Config::default().with_animation(Animation::Spring),
		Rc::new(JsHost::new(plugin_host)),
	)
	.unwrap();
	let key = swapy.instance_key().as_str();

	let recorded = recorded.borrow();
	assert_eq!(recorded.options.len(), 1);
	let option = |name: &str| Reflect::get(&recorded.options[0], &JsValue::from_str(name)).unwrap();
	assert_eq!(option("pluginKey").as_string().as_deref(), Some(key));
	assert_eq!(option("animation").as_string().as_deref(), Some("spring"));
	assert_eq!(option("continuousMode").as_bool(), Some(true));

	let subscribed: Vec<_> = recorded
		.subscriptions
		.iter()
		.map(|(event_type, plugin_key, _)| (event_type.as_str(), plugin_key.as_str()))
		.collect();
	assert_eq!(subscribed, vec![("SwapyPluginInitEvent", key), ("SwapEvent", key)]);
}

#[wasm_bindgen_test]
fn js_host_routes_events_and_enablement() {
	let (plugin_host, recorded) = recording_host();
	let swapy = create_swapy(Some(mount(LEFT_RIGHT)), Config::default(), Rc::new(JsHost::new(plugin_host))).unwrap();
	let calls = Rc::new(RefCell::new(vec![]));
	swapy.on_swap({
		let calls = calls.clone();
		move |event| calls.borrow_mut().push(event.map.clone())
	});

	subscribed_handler(&recorded, "SwapyPluginInitEvent")
		.call1(&JsValue::UNDEFINED, &event(&[("left", Some("x")), ("right", Some("y"))]))
		.unwrap();
	assert!(calls.borrow().is_empty());

	let on_swap = subscribed_handler(&recorded, "SwapEvent");
	on_swap.call1(&JsValue::UNDEFINED, &object(&[])).unwrap();
	assert!(calls.borrow().is_empty());

	on_swap
		.call1(&JsValue::UNDEFINED, &event(&[("left", Some("y")), ("right", Some("x"))]))
		.unwrap();
	assert_eq!(occupant(swapy.root(), "left").as_deref(), Some("y"));
	assert_eq!(occupant(swapy.root(), "right").as_deref(), Some("x"));
	assert_eq!(*calls.borrow(), vec![map(&[("left", Some("y")), ("right", Some("x"))])]);

	swapy.enable(false);
	swapy.enable(true);
	let key = swapy.instance_key().as_str().to_owned();
	assert_eq!(recorded.borrow().enabled, vec![(key.clone(), false), (key, true)]);
}

#[wasm_bindgen_test]
fn decode_map() {
	let js = js_map(&[("left", Some("x")), ("right", None), ("", Some("y")), ("middle", Some(""))]);
	assert_eq!(assignment_map_from_js(&js), map(&[("left", Some("x")), ("right", None), ("middle", None)]));
}

#[wasm_bindgen_test]
fn decode_init_event() {
	let event = object(&[("data", object(&[("map", js_map(&[("a", Some("x"))]).into())]))]);
	match EngineEvent::from_js(EventKind::Init, &event) {
		Some(EngineEvent::Init(init)) => assert_eq!(init.map, map(&[("a", Some("x"))])),
		other => panic!("Expected init event but got {:?}", other),
	}
}

#[wasm_bindgen_test]
fn decode_swap_event_keeps_metadata() {
	let data = object(&[("map", js_map(&[("a", None), ("b", Some("x"))]).into()), ("draggingItem", JsValue::from_str("x"))]);
	match EngineEvent::from_js(EventKind::Swap, &data) {
		Some(EngineEvent::Swap(swap)) => {
			assert_eq!(swap.map, map(&[("a", None), ("b", Some("x"))]));
			assert_eq!(Reflect::get(&swap.metadata, &JsValue::from_str("draggingItem")).unwrap().as_string().as_deref(), Some("x"));
		}
		other => panic!("Expected swap event but got {:?}", other),
	}
}

#[wasm_bindgen_test]
fn undecodable_event() {
	assert!(EngineEvent::from_js(EventKind::Swap, &object(&[("data", object(&[]))])).is_none());
	assert!(EngineEvent::from_js(EventKind::Init, &JsValue::NULL).is_none());
}

#[wasm_bindgen_test]
fn config_from_js() {
	assert_eq!(Config::from_js(&JsValue::UNDEFINED), Config::default());
	assert_eq!(
		Config::from_js(&object(&[("animation", JsValue::from_str("spring")), ("continuousMode", JsValue::FALSE)])),
		Config::default().with_animation(Animation::Spring).with_continuous_mode(false)
	);
	assert_eq!(
		Config::from_js(&object(&[("animation", JsValue::from_str("bouncy")), ("continuousMode", JsValue::from_str("no"))])),
		Config::default()
	);
}
