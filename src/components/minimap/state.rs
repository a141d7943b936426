use log::debug;

use super::activity::ActivityTracker;
use super::config::MinimapConfig;
use super::drag::{DragController, PointerPress};
use super::error::MinimapError;
use super::host::{ExecutingNode, MinimapHost, PreviewSource};
use super::render::{self, Frame};
use super::scale::Transform;
use super::surface::Surface;

/// Where an activity event was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOrigin {
	MainView,
	/// The minimap's own canvas. Seen only when listening above it, e.g. on the window.
	Minimap,
}

/// Per-instance engine state. Owned by one minimap; nothing here is global.
pub struct MinimapState {
	pub config: MinimapConfig,
	pub drag: DragController,
	pub activity: ActivityTracker,
	pub executing: ExecutingNode,
	published: Option<Transform>,
}

impl MinimapState {
	pub fn new(config: MinimapConfig, executing: ExecutingNode, now_ms: f64) -> Self {
		let activity = ActivityTracker::new(config.fade_delay_ms, now_ms);
		Self {
			config,
			drag: DragController::new(),
			activity,
			executing,
			published: None,
		}
	}

	/// One render pass. Without a surface the previous frame and transform
	/// are left as they are.
	pub fn render_tick<S: Surface + ?Sized>(
		&mut self,
		surface: Option<&mut S>,
		host: &dyn MinimapHost,
		preview: &dyn PreviewSource,
	) -> Result<Transform, MinimapError> {
		let surface = surface.ok_or(MinimapError::MissingSurface)?;
		let snapshot = host.snapshot();
		let frame = Frame {
			snapshot: &snapshot,
			view: host.view_state(),
			background: host.background_color(),
			executing: self.executing.get(),
			config: &self.config,
			preview,
		};
		let transform = render::render(surface, &frame);
		self.published = Some(transform);
		Ok(transform)
	}

	pub fn pointer_down(
		&mut self,
		press: PointerPress,
		pointer: (f64, f64),
		host: &dyn MinimapHost,
	) -> bool {
		if self.drag.is_dragging() {
			return false;
		}
		let Some(view) = host.view_state() else {
			debug!("minimap: main view not ready, ignoring press");
			return false;
		};
		self.drag.pointer_down(press, pointer, view.offset)
	}

	/// Pans the main view while dragging. Returns whether the view moved.
	pub fn pointer_move(&mut self, pointer: (f64, f64), host: &dyn MinimapHost) -> bool {
		match self.drag.pointer_move(pointer, self.published) {
			Some(offset) => {
				host.set_view_offset(offset);
				host.mark_dirty();
				true
			}
			None => false,
		}
	}

	pub fn pointer_release(&mut self) {
		self.drag.release();
	}

	/// Interaction seen by an activity listener. Only main-view events keep
	/// the overlay visible. Returns the overlay opacity to apply when it changed.
	pub fn activity_event(&mut self, origin: EventOrigin, now_ms: f64) -> Option<f64> {
		if origin == EventOrigin::Minimap {
			return None;
		}
		self.activity
			.record_activity(now_ms)
			.map(|o| o * self.config.opacity)
	}

	pub fn fade_check(&mut self, now_ms: f64) -> Option<f64> {
		self.activity.check(now_ms).map(|o| o * self.config.opacity)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;
	use crate::components::minimap::host::NoPreview;
	use crate::components::minimap::surface::recording::RecordingSurface;
	use crate::components::minimap::types::{GraphNode, GraphSnapshot, ViewState};

	struct FakeHost {
		snapshot: GraphSnapshot,
		view: RefCell<Option<ViewState>>,
		dirty: Cell<usize>,
	}

	impl FakeHost {
		fn new(view: Option<ViewState>) -> Self {
			Self {
				snapshot: GraphSnapshot {
					nodes: vec![GraphNode::new(1, [0.0, 0.0], [400.0, 120.0])],
					..GraphSnapshot::default()
				},
				view: RefCell::new(view),
				dirty: Cell::new(0),
			}
		}
	}

	impl MinimapHost for FakeHost {
		fn snapshot(&self) -> GraphSnapshot {
			self.snapshot.clone()
		}

		fn view_state(&self) -> Option<ViewState> {
			*self.view.borrow()
		}

		fn set_view_offset(&self, offset: [f64; 2]) {
			if let Some(view) = self.view.borrow_mut().as_mut() {
				view.offset = offset;
			}
		}

		fn mark_dirty(&self) {
			self.dirty.set(self.dirty.get() + 1);
		}
	}

	fn view(offset: [f64; 2]) -> Option<ViewState> {
		Some(ViewState {
			offset,
			scale: 1.0,
			size: [800.0, 600.0],
		})
	}

	#[test]
	fn test_missing_surface_keeps_previous_transform() {
		let host = FakeHost::new(view([0.0, 0.0]));
		let mut state = MinimapState::new(MinimapConfig::default(), ExecutingNode::new(), 0.0);
		let mut surface = RecordingSurface::new(300.0, 160.0);
		let first = state
			.render_tick(Some(&mut surface), &host, &NoPreview)
			.unwrap();
		let err = state.render_tick(None::<&mut RecordingSurface>, &host, &NoPreview);
		assert_eq!(err, Err(MinimapError::MissingSurface));
		assert_eq!(state.published, Some(first));
	}

	#[test]
	fn test_drag_pans_host_view() {
		let host = FakeHost::new(view([100.0, 100.0]));
		let mut state = MinimapState::new(MinimapConfig::default(), ExecutingNode::new(), 0.0);
		let mut surface = RecordingSurface::new(300.0, 160.0);
		// 400x120 node + 200 padding on a 300x160 surface -> scale 0.5
		let t = state
			.render_tick(Some(&mut surface), &host, &NoPreview)
			.unwrap();
		assert!((t.scale - 0.5).abs() < 1e-12);

		assert!(state.pointer_down(PointerPress::default(), (10.0, 10.0), &host));
		assert!(state.pointer_move((30.0, 20.0), &host));
		assert_eq!(host.view_state().map(|v| v.offset), Some([60.0, 80.0]));
		assert_eq!(host.dirty.get(), 1);

		state.pointer_release();
		assert!(!state.pointer_move((50.0, 50.0), &host));
		assert_eq!(host.dirty.get(), 1);
	}

	#[test]
	fn test_press_without_view_is_ignored() {
		let host = FakeHost::new(None);
		let mut state = MinimapState::new(MinimapConfig::default(), ExecutingNode::new(), 0.0);
		assert!(!state.pointer_down(PointerPress::default(), (0.0, 0.0), &host));
		assert!(!state.drag.is_dragging());
	}

	#[test]
	fn test_executing_node_outlined() {
		let host = FakeHost::new(view([0.0, 0.0]));
		let executing = ExecutingNode::new();
		let mut state = MinimapState::new(MinimapConfig::default(), executing.clone(), 0.0);
		executing.set(Some(1));
		let mut surface = RecordingSurface::new(300.0, 160.0);
		state
			.render_tick(Some(&mut surface), &host, &NoPreview)
			.unwrap();
		let active = &state.config.theme.active_outline;
		assert!(surface.strokes().iter().any(|(_, c, _)| c == active));
	}

	#[test]
	fn test_opacity_scaled_by_config() {
		let config = MinimapConfig::default().with_opacity(0.8);
		let mut state = MinimapState::new(config, ExecutingNode::new(), 0.0);
		assert_eq!(state.fade_check(3001.0), Some(0.0));
		assert_eq!(state.activity_event(EventOrigin::MainView, 3100.0), Some(0.8));
	}

	#[test]
	fn test_minimap_events_are_not_main_view_activity() {
		let mut state = MinimapState::new(MinimapConfig::default(), ExecutingNode::new(), 0.0);
		assert_eq!(state.fade_check(3001.0), Some(0.0));
		assert_eq!(state.activity_event(EventOrigin::Minimap, 3100.0), None);
		assert_eq!(state.fade_check(3200.0), None);
		assert_eq!(state.activity_event(EventOrigin::MainView, 3300.0), Some(1.0));

		// hovering the minimap must not hold off the fade either
		assert_eq!(state.activity_event(EventOrigin::Minimap, 6000.0), None);
		assert_eq!(state.fade_check(6301.0), Some(0.0));
	}
}
