use std::collections::BTreeMap;

/// Host-assigned node identifier. `0` is never a real node.
pub type NodeId = i64;

#[derive(Clone, Debug, Default)]
pub struct GraphNode {
	pub id: NodeId,
	pub pos: [f64; 2],
	pub size: [f64; 2],
	pub color: Option<String>,
	pub collapsed: bool,
	pub collapsed_width: Option<f64>,
	pub is_virtual: bool,
	pub mode: i32,
	/// Named boolean flags as reported by the host (`has_errors`, `muted`, ...).
	pub flags: BTreeMap<String, bool>,
	pub widgets_invalid: Vec<String>,
	/// Answer of the node's own bypass check, when it exposes one.
	pub reports_bypassed: Option<bool>,
}

impl GraphNode {
	pub fn new(id: NodeId, pos: [f64; 2], size: [f64; 2]) -> Self {
		Self {
			id,
			pos,
			size,
			..Self::default()
		}
	}

	pub fn flag(&self, name: &str) -> bool {
		self.flags.get(name).copied().unwrap_or(false)
	}

	pub fn with_flag(mut self, name: &str, value: bool) -> Self {
		self.flags.insert(name.to_owned(), value);
		self
	}

	/// Position and size are finite and the size is non-negative.
	pub fn has_geometry(&self) -> bool {
		finite_extent(self.pos, self.size)
	}
}

#[derive(Clone, Debug, Default)]
pub struct GraphGroup {
	pub pos: [f64; 2],
	pub size: [f64; 2],
	pub color: Option<String>,
}

impl GraphGroup {
	pub fn has_geometry(&self) -> bool {
		finite_extent(self.pos, self.size)
	}
}

#[derive(Clone, Debug, Default)]
pub struct GraphLink {
	pub origin: NodeId,
	pub target: NodeId,
	pub origin_slot: usize,
	pub target_slot: usize,
	pub link_type: String,
	pub color: Option<String>,
}

/// Read-only view of the host graph for a single render tick.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	pub nodes: Vec<GraphNode>,
	pub groups: Vec<GraphGroup>,
	pub links: Vec<GraphLink>,
}

/// The main view's pan/zoom as the host sees it.
///
/// A graph point `g` appears on the main view at `(g + offset) * scale`, so the
/// visible region in graph space starts at `-offset` and spans `size / scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
	pub offset: [f64; 2],
	pub scale: f64,
	pub size: [f64; 2],
}

impl ViewState {
	pub fn visible_region(&self) -> Option<Rect> {
		if !(self.scale > 0.0) {
			return None;
		}
		Some(Rect::new(
			-self.offset[0],
			-self.offset[1],
			self.size[0] / self.scale,
			self.size[1] / self.scale,
		))
	}
}

/// Axis-aligned rectangle; used for graph-space bounds and surface-space boxes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
		Self { x, y, w, h }
	}

	pub fn right(&self) -> f64 {
		self.x + self.w
	}
}

fn finite_extent(pos: [f64; 2], size: [f64; 2]) -> bool {
	pos.iter().chain(size.iter()).all(|v| v.is_finite()) && size[0] >= 0.0 && size[1] >= 0.0
}
