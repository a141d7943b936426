use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, PointerEvent};

use super::config::MinimapConfig;
use super::drag::PointerPress;
use super::host::{ExecutingNode, MinimapHost, NoPreview, PreviewSource};
use super::scheduler::{IntervalDriver, Scheduler, WindowIntervals};
use super::state::{EventOrigin, MinimapState};
use super::surface::CanvasSurface;

/// Main-view events that keep the overlay visible.
pub const ACTIVITY_EVENTS: &[&str] = &[
	"pointerdown",
	"pointermove",
	"pointerup",
	"pointerleave",
	"wheel",
];

type Listener = (EventTarget, &'static str, Closure<dyn FnMut(Event)>);

/// Timers and main-view listeners of one mounted minimap.
pub struct MinimapEngine {
	canvas: HtmlCanvasElement,
	state: Rc<RefCell<MinimapState>>,
	host: Rc<dyn MinimapHost>,
	preview: Rc<dyn PreviewSource>,
	scheduler: Scheduler,
	listeners: Vec<Listener>,
}

impl MinimapEngine {
	pub fn new(
		canvas: HtmlCanvasElement,
		state: Rc<RefCell<MinimapState>>,
		host: Rc<dyn MinimapHost>,
		preview: Rc<dyn PreviewSource>,
		driver: Rc<dyn IntervalDriver>,
	) -> Self {
		Self {
			canvas,
			state,
			host,
			preview,
			scheduler: Scheduler::new(driver),
			listeners: Vec::new(),
		}
	}

	pub fn is_running(&self) -> bool {
		self.scheduler.is_running()
	}

	pub fn start(&mut self) {
		if self.is_running() {
			return;
		}
		let (render_ms, fade_ms) = {
			let state = self.state.borrow();
			(
				state.config.render_interval_ms,
				state.config.fade_check_interval_ms,
			)
		};

		let (canvas, state, host, preview) = (
			self.canvas.clone(),
			self.state.clone(),
			self.host.clone(),
			self.preview.clone(),
		);
		render_into(&canvas, &state, &*host, &*preview);
		self.scheduler.every(render_ms, move || {
			render_into(&canvas, &state, &*host, &*preview);
		});

		let (canvas, state) = (self.canvas.clone(), self.state.clone());
		self.scheduler.every(fade_ms, move || {
			let changed = state.borrow_mut().fade_check(js_sys::Date::now());
			if let Some(opacity) = changed {
				apply_opacity(&canvas, opacity);
			}
		});

		let target = self
			.host
			.activity_target()
			.or_else(|| web_sys::window().map(EventTarget::from));
		if let Some(target) = target {
			for &name in ACTIVITY_EVENTS {
				let (canvas, state) = (self.canvas.clone(), self.state.clone());
				let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
					let origin = event_origin(&ev, &canvas);
					let changed = state.borrow_mut().activity_event(origin, js_sys::Date::now());
					if let Some(opacity) = changed {
						apply_opacity(&canvas, opacity);
					}
				});
				let added =
					target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
				match added {
					Ok(()) => self.listeners.push((target.clone(), name, callback)),
					Err(_) => warn!("minimap: could not listen for {name}"),
				}
			}
		} else {
			warn!("minimap: no activity target; overlay will not fade back in");
		}
		info!("minimap: started ({render_ms}ms render, {fade_ms}ms fade check)");
	}

	/// Clears timers and detaches listeners. Safe to call repeatedly.
	pub fn stop(&mut self) {
		if !self.is_running() && self.listeners.is_empty() {
			return;
		}
		self.scheduler.stop();
		for (target, name, callback) in self.listeners.drain(..) {
			let _ = target
				.remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
		}
		self.state.borrow_mut().pointer_release();
		info!("minimap: stopped");
	}
}

impl Drop for MinimapEngine {
	fn drop(&mut self) {
		self.stop();
	}
}

fn render_into(
	canvas: &HtmlCanvasElement,
	state: &RefCell<MinimapState>,
	host: &dyn MinimapHost,
	preview: &dyn PreviewSource,
) {
	let mut surface = CanvasSurface::from_canvas(canvas).ok();
	let result = state
		.borrow_mut()
		.render_tick(surface.as_mut(), host, preview);
	if let Err(err) = result {
		warn!("minimap: {err}, keeping previous frame");
	}
}

fn apply_opacity(canvas: &HtmlCanvasElement, opacity: f64) {
	// leptos' `ElementExt::style` shadows the DOM getter
	let style = web_sys::HtmlElement::style(canvas);
	if style.set_property("opacity", &opacity.to_string()).is_err() {
		warn!("minimap: could not set opacity");
	}
}

/// The minimap canvas has no children, so its events target it directly.
fn event_origin(ev: &Event, canvas: &HtmlCanvasElement) -> EventOrigin {
	let canvas: &EventTarget = canvas.as_ref();
	if ev.target().as_ref() == Some(canvas) {
		EventOrigin::Minimap
	} else {
		EventOrigin::MainView
	}
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &PointerEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Pinned overlay showing the whole graph; drag on it to pan the main view.
///
/// The engine lives as long as the mounting effect, so unmounting the
/// component clears its timers and listeners.
#[component]
pub fn Minimap(
	host: Rc<dyn MinimapHost>,
	#[prop(optional)] config: Option<MinimapConfig>,
	#[prop(optional)] executing: Option<ExecutingNode>,
	#[prop(optional)] preview: Option<Rc<dyn PreviewSource>>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let style = format!(
		"position: fixed; {} width: {}px; height: {}px; opacity: {}; \
		 transition: opacity 0.5s ease; z-index: 1000; cursor: grab; \
		 border: 1px solid rgba(255, 255, 255, 0.2);",
		config.corner.css(config.margin),
		config.width,
		config.height,
		config.opacity,
	);
	let (width, height) = (config.width, config.height);

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(MinimapState::new(
		config,
		executing.unwrap_or_default(),
		js_sys::Date::now(),
	)));
	let preview: Rc<dyn PreviewSource> = preview.unwrap_or_else(|| Rc::new(NoPreview));
	let engine: Rc<RefCell<Option<MinimapEngine>>> = Rc::new(RefCell::new(None));

	let (state_init, host_init) = (state.clone(), host.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width);
		canvas.set_height(height);

		let mut started = MinimapEngine::new(
			canvas,
			state_init.clone(),
			host_init.clone(),
			preview.clone(),
			Rc::new(WindowIntervals::default()),
		);
		started.start();
		// Replacing a previous engine drops it, which stops it.
		*engine.borrow_mut() = Some(started);
	});

	let (state_pd, host_pd) = (state.clone(), host.clone());
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(pos) = local_position(canvas_ref, &ev) else {
			return;
		};
		let press = PointerPress {
			button: ev.button(),
			ctrl: ev.ctrl_key(),
			shift: ev.shift_key(),
			alt: ev.alt_key(),
			meta: ev.meta_key(),
		};
		if state_pd.borrow_mut().pointer_down(press, pos, &*host_pd) {
			ev.prevent_default();
		}
	};

	let (state_pm, host_pm) = (state.clone(), host.clone());
	let on_pointermove = move |ev: PointerEvent| {
		let Some(pos) = local_position(canvas_ref, &ev) else {
			return;
		};
		state_pm.borrow_mut().pointer_move(pos, &*host_pm);
	};

	let state_pu = state.clone();
	let on_pointerup = move |_: PointerEvent| {
		state_pu.borrow_mut().pointer_release();
	};

	let state_pl = state.clone();
	let on_pointerleave = move |_: PointerEvent| {
		state_pl.borrow_mut().pointer_release();
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-minimap"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointerleave=on_pointerleave
			style=style
		/>
	}
}
