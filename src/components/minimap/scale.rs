//! Graph bounds and the graph-space to surface-space projection.

use log::debug;

use super::types::{GraphSnapshot, Rect, ViewState};

/// Uniform scale plus translation for one render tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub scale: f64,
	pub origin_x: f64,
	pub origin_y: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Transform {
	pub const IDENTITY: Self = Self {
		scale: 1.0,
		origin_x: 0.0,
		origin_y: 0.0,
	};

	/// The main view's own mapping, `(g + offset) * scale`.
	pub fn for_view(view: &ViewState) -> Self {
		Self {
			scale: view.scale,
			origin_x: -view.offset[0],
			origin_y: -view.offset[1],
		}
	}

	pub fn to_surface(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			(gx - self.origin_x) * self.scale,
			(gy - self.origin_y) * self.scale,
		)
	}

	pub fn to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(sx / self.scale + self.origin_x, sy / self.scale + self.origin_y)
	}

	pub fn rect_to_surface(&self, r: Rect) -> Rect {
		let (x, y) = self.to_surface(r.x, r.y);
		Rect::new(x, y, r.w * self.scale, r.h * self.scale)
	}
}

/// Smallest rectangle holding every node and group. Entities with unusable
/// geometry are left out; an empty graph yields a zero rectangle at the origin.
pub fn compute_bounds(snapshot: &GraphSnapshot) -> Rect {
	let nodes = snapshot
		.nodes
		.iter()
		.filter(|n| {
			let ok = n.has_geometry();
			if !ok {
				debug!("minimap: node {} has no usable geometry", n.id);
			}
			ok
		})
		.map(|n| (n.pos, n.size));
	let groups = snapshot
		.groups
		.iter()
		.filter(|g| g.has_geometry())
		.map(|g| (g.pos, g.size));

	let extent = nodes.chain(groups).fold(None, |acc, (pos, size)| {
		let (l, t, r, b) = (pos[0], pos[1], pos[0] + size[0], pos[1] + size[1]);
		Some(match acc {
			None => (l, t, r, b),
			Some((ml, mt, mr, mb)) => (
				f64::min(ml, l),
				f64::min(mt, t),
				f64::max(mr, r),
				f64::max(mb, b),
			),
		})
	});

	match extent {
		Some((l, t, r, b)) => Rect::new(l, t, r - l, b - t),
		None => Rect::default(),
	}
}

/// Fits `bounds` (plus `padding`) into the surface with a single scale factor.
/// Degenerate bounds (nothing to show) get the neutral scale 1.
pub fn compute_transform(bounds: Rect, surface_w: f64, surface_h: f64, padding: f64) -> Transform {
	let (span_w, span_h) = (bounds.w + padding, bounds.h + padding);
	let degenerate = bounds.w <= 0.0 && bounds.h <= 0.0;
	let scale = if degenerate || span_w <= 0.0 || span_h <= 0.0 {
		1.0
	} else {
		f64::min(surface_w / span_w, surface_h / span_h)
	};
	let scale = if scale.is_finite() && scale > 0.0 {
		scale
	} else {
		1.0
	};
	Transform {
		scale,
		origin_x: bounds.x,
		origin_y: bounds.y,
	}
}
