use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::components::minimap::render::{self, Frame};
use crate::components::minimap::scale::Transform;
use crate::components::minimap::{
	CanvasSurface, Corner, DEFAULT_BYPASS_MODE, ExecutingNode, GraphGroup, GraphLink, GraphNode,
	GraphSnapshot, Minimap, MinimapConfig, MinimapHost, NoPreview, Rect, Scheduler, Surface,
	ViewState, WindowIntervals,
};

const BACKGROUND: &str = "#1a1a2e";
const LINK_TYPES: &[&str] = &["MODEL", "CLIP", "CONDITIONING", "LATENT", "IMAGE", "VAE"];

/// Generate a sample workflow-like graph laid out in columns.
fn generate_sample_data(n: usize) -> GraphSnapshot {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| {
			let (col, row) = ((i % 8) as f64, (i / 8) as f64);
			let mut node = GraphNode::new(
				i as i64 + 1,
				[col * 320.0, row * 240.0],
				[220.0, 110.0 + (i % 3) as f64 * 30.0],
			);
			match i {
				9 => node = node.with_flag("has_errors", true),
				14 => node.mode = DEFAULT_BYPASS_MODE,
				20 => node = node.with_flag("muted", true),
				27 => {
					node = node.with_flag("has_errors", true);
					node.mode = DEFAULT_BYPASS_MODE;
				}
				_ if i % 11 == 5 => node.collapsed = true,
				_ if i % 13 == 7 => {
					node.is_virtual = true;
					node.size = [75.0, 26.0];
				}
				_ => {}
			}
			if i % 7 == 3 {
				node.color = Some("#335".into());
			}
			node
		})
		.collect();

	let mut links: Vec<GraphLink> = (1..n)
		.map(|i| {
			let origin = (rand_simple(i) * (i as f64)) as i64 + 1;
			GraphLink {
				origin,
				target: i as i64 + 1,
				origin_slot: i % 2,
				target_slot: i % 3,
				link_type: LINK_TYPES[i % LINK_TYPES.len()].into(),
				color: None,
			}
		})
		.collect();
	// dangling on purpose; the minimap must skip it
	links.push(GraphLink {
		origin: 1,
		target: 9999,
		..GraphLink::default()
	});

	let groups = vec![
		GraphGroup {
			pos: [-40.0, -80.0],
			size: [1000.0, 560.0],
			color: Some("#3f789e".into()),
		},
		GraphGroup {
			pos: [1240.0, 400.0],
			size: [900.0, 500.0],
			color: Some("#8A8".into()),
		},
	];

	GraphSnapshot {
		nodes,
		groups,
		links,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// The demo's own main view: owns the graph and the pan/zoom.
struct DemoHost {
	graph: GraphSnapshot,
	view: Cell<ViewState>,
	dirty: Cell<bool>,
	canvas: NodeRef<leptos::html::Canvas>,
}

impl MinimapHost for DemoHost {
	fn snapshot(&self) -> GraphSnapshot {
		self.graph.clone()
	}

	fn view_state(&self) -> Option<ViewState> {
		Some(self.view.get())
	}

	fn set_view_offset(&self, offset: [f64; 2]) {
		let mut view = self.view.get();
		view.offset = offset;
		self.view.set(view);
	}

	fn mark_dirty(&self) {
		self.dirty.set(true);
	}

	fn background_color(&self) -> Option<String> {
		Some(BACKGROUND.into())
	}

	fn activity_target(&self) -> Option<EventTarget> {
		let canvas: HtmlCanvasElement = self.canvas.get_untracked()?.into();
		Some(canvas.into())
	}
}

fn draw_main_view(host: &DemoHost, executing: &ExecutingNode, config: &MinimapConfig) {
	let Some(canvas) = host.canvas.get_untracked() else {
		return;
	};
	let canvas: HtmlCanvasElement = canvas.into();
	let Ok(mut surface) = CanvasSurface::from_canvas(&canvas) else {
		return;
	};
	let (w, h) = surface.size();
	surface.clear();
	surface.fill_rect(Rect::new(0.0, 0.0, w, h), BACKGROUND);
	let view = host.view.get();
	let frame = Frame {
		snapshot: &host.graph,
		view: Some(view),
		background: None,
		executing: executing.get(),
		config,
		preview: &NoPreview,
	};
	render::draw_graph(&mut surface, &frame, Transform::for_view(&view));
}

#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	offset_start: [f64; 2],
}

fn minimap_config(corner: Corner) -> MinimapConfig {
	MinimapConfig::default()
		.with_size(320, 180)
		.with_corner(corner)
		.with_margin(12.0)
		.with_opacity(0.95)
		.with_fade_delay_ms(3000.0)
		.with_bypass_mode(DEFAULT_BYPASS_MODE)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// `/?corner=top-left` moves the overlay
	let corner = use_query_map()
		.read_untracked()
		.get("corner")
		.and_then(|name| Corner::parse(&name))
		.unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let graph = generate_sample_data(60);
	let host = Rc::new(DemoHost {
		graph,
		view: Cell::new(ViewState {
			offset: [40.0, 120.0],
			scale: 0.8,
			size: [800.0, 600.0],
		}),
		dirty: Cell::new(true),
		canvas: canvas_ref,
	});
	let executing = ExecutingNode::new();
	let pan = Rc::new(RefCell::new(PanState::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let ticker: Rc<RefCell<Option<Scheduler>>> = Rc::new(RefCell::new(None));

	let (host_init, exec_init, animate_init, ticker_init) = (
		host.clone(),
		executing.clone(),
		animate.clone(),
		ticker.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};
		let (w, h) = (
			window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
			window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let mut view = host_init.view.get();
		view.size = [w, h];
		host_init.view.set(view);

		// Pretend a workflow is running: walk the nodes once a second.
		let mut scheduler = Scheduler::new(Rc::new(WindowIntervals::default()));
		let (exec_tick, host_tick) = (exec_init.clone(), host_init.clone());
		let count = host_init.graph.nodes.len() as i64;
		scheduler.every(1000, move || {
			let next = exec_tick.get().map_or(1, |id| id % count + 1);
			exec_tick.set_from_event(Some(next));
			host_tick.mark_dirty();
		});
		*ticker_init.borrow_mut() = Some(scheduler);

		let (host_anim, exec_anim, animate_inner) =
			(host_init.clone(), exec_init.clone(), animate_init.clone());
		let config = minimap_config(corner);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if host_anim.dirty.replace(false) {
				draw_main_view(&host_anim, &exec_anim, &config);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (pan_md, host_md) = (pan.clone(), host.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let mut pan = pan_md.borrow_mut();
		pan.active = true;
		pan.start_x = ev.client_x() as f64;
		pan.start_y = ev.client_y() as f64;
		pan.offset_start = host_md.view.get().offset;
	};

	let (pan_mm, host_mm) = (pan.clone(), host.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let pan = pan_mm.borrow();
		if !pan.active {
			return;
		}
		let scale = host_mm.view.get().scale;
		host_mm.set_view_offset([
			pan.offset_start[0] + (ev.client_x() as f64 - pan.start_x) / scale,
			pan.offset_start[1] + (ev.client_y() as f64 - pan.start_y) / scale,
		]);
		host_mm.mark_dirty();
	};

	let pan_mu = pan.clone();
	let on_mouseup = move |_: MouseEvent| {
		pan_mu.borrow_mut().active = false;
	};

	let pan_ml = pan.clone();
	let on_mouseleave = move |_: MouseEvent| {
		pan_ml.borrow_mut().active = false;
	};

	let host_wh = host.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
		let mut view = host_wh.view.get();
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		let new_scale = (view.scale * factor).clamp(0.1, 10.0);
		// keep the graph point under the cursor fixed
		let (gx, gy) = (x / view.scale - view.offset[0], y / view.scale - view.offset[1]);
		view.offset = [x / new_scale - gx, y / new_scale - gy];
		view.scale = new_scale;
		host_wh.view.set(view);
		host_wh.mark_dirty();
	};

	let minimap_host: Rc<dyn MinimapHost> = host.clone();
	view! {
		<div class="fullscreen-graph">
			<canvas
				node_ref=canvas_ref
				class="main-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<Minimap host=minimap_host config=minimap_config(corner) executing=executing />
			<div class="graph-overlay">
				<h1>"Graph Minimap"</h1>
				<p class="subtitle">"Drag to pan, scroll to zoom, or drag inside the minimap."</p>
			</div>
		</div>
	}
}
