use std::cell::Cell;
use std::rc::Rc;

use web_sys::{EventTarget, HtmlImageElement};

use super::types::{GraphNode, GraphSnapshot, NodeId, ViewState};

/// What the minimap needs from the application that owns the graph.
pub trait MinimapHost {
	/// Current graph; called once per render tick and never retained.
	fn snapshot(&self) -> GraphSnapshot;

	/// `None` while the main view is not ready.
	fn view_state(&self) -> Option<ViewState>;

	fn set_view_offset(&self, offset: [f64; 2]);

	/// Ask the main view to redraw.
	fn mark_dirty(&self);

	fn background_color(&self) -> Option<String> {
		None
	}

	/// Element whose pointer and wheel events count as activity. Falls back
	/// to the window, in which case events on the minimap itself are ignored.
	fn activity_target(&self) -> Option<EventTarget> {
		None
	}
}

/// Optional per-node image overlay.
pub trait PreviewSource {
	fn preview(&self, node: &GraphNode) -> Option<HtmlImageElement>;
}

pub struct NoPreview;

impl PreviewSource for NoPreview {
	fn preview(&self, _node: &GraphNode) -> Option<HtmlImageElement> {
		None
	}
}

/// Id of the node currently executing. Written by the execution event
/// handler, read by every render tick.
#[derive(Clone, Debug, Default)]
pub struct ExecutingNode(Rc<Cell<Option<NodeId>>>);

impl ExecutingNode {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self) -> Option<NodeId> {
		self.0.get()
	}

	pub fn set(&self, id: Option<NodeId>) {
		self.0.set(id);
	}

	/// Execution events use `null` or `0` for "nothing running".
	pub fn set_from_event(&self, raw: Option<NodeId>) {
		self.set(raw.filter(|id| *id != 0));
	}
}
