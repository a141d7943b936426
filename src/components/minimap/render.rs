use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use super::classify::{NodeClass, classify};
use super::config::{MinimapConfig, Theme};
use super::error::MinimapError;
use super::host::PreviewSource;
use super::scale::{Transform, compute_bounds, compute_transform};
use super::surface::Surface;
use super::types::{GraphLink, GraphNode, GraphSnapshot, NodeId, Rect, ViewState};

pub const TITLE_HEIGHT: f64 = 30.0;
pub const SLOT_SPACING: f64 = 20.0;
pub const SLOT_OFFSET: f64 = 14.0;
/// Output anchors sit this far inside the node's right edge.
pub const ANCHOR_INSET: f64 = 10.0;
pub const COLLAPSED_WIDTH: f64 = 80.0;
pub const GROUP_ALPHA: f64 = 0.35;
pub const TERMINAL_RADIUS: f64 = 1.5;

/// Everything a draw pass reads, gathered once per tick.
pub struct Frame<'a> {
	pub snapshot: &'a GraphSnapshot,
	pub view: Option<ViewState>,
	pub background: Option<String>,
	pub executing: Option<NodeId>,
	pub config: &'a MinimapConfig,
	pub preview: &'a dyn PreviewSource,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawStats {
	pub links: usize,
	pub groups: usize,
	pub nodes: usize,
	pub terminals: usize,
	pub skipped: Vec<MinimapError>,
}

/// Full minimap pass. Returns the transform used so pointer input can be
/// mapped back into graph space.
pub fn render<S: Surface + ?Sized>(surface: &mut S, frame: &Frame) -> Transform {
	let (width, height) = surface.size();
	surface.clear();
	if let Some(bg) = frame.background.as_deref().filter(|c| !c.is_empty()) {
		surface.fill_rect(Rect::new(0.0, 0.0, width, height), bg);
	}

	let bounds = compute_bounds(frame.snapshot);
	let transform = compute_transform(bounds, width, height, frame.config.padding);

	let stats = draw_graph(surface, frame, transform);
	trace!(
		"minimap: {} links, {} groups, {} nodes, {} terminals at scale {:.3}",
		stats.links, stats.groups, stats.nodes, stats.terminals, transform.scale
	);
	if !stats.skipped.is_empty() {
		debug!("minimap: skipped {} entities: {:?}", stats.skipped.len(), stats.skipped);
	}

	if let Some(region) = frame.view.and_then(|v| v.visible_region()) {
		let theme = &frame.config.theme;
		surface.stroke_rect(
			transform.rect_to_surface(region),
			&theme.viewport_outline,
			theme.viewport_outline_width,
		);
	}
	transform
}

/// Links, groups, nodes and terminals under `transform`, in that order.
pub fn draw_graph<S: Surface + ?Sized>(
	surface: &mut S,
	frame: &Frame,
	transform: Transform,
) -> DrawStats {
	let theme = &frame.config.theme;
	let mut stats = DrawStats::default();
	let nodes: HashMap<NodeId, &GraphNode> = frame
		.snapshot
		.nodes
		.iter()
		.filter(|n| n.has_geometry())
		.map(|n| (n.id, n))
		.collect();

	let mut terminals = Vec::new();
	for (index, link) in frame.snapshot.links.iter().enumerate() {
		let (from, to) = match link_anchors(&nodes, index, link) {
			Ok(anchors) => anchors,
			Err(err) => {
				stats.skipped.push(err);
				continue;
			}
		};
		let (from, to) = (
			transform.to_surface(from.0, from.1),
			transform.to_surface(to.0, to.1),
		);
		let color = theme.link_color(&link.link_type, link.color.as_deref());
		surface.line(from, to, color, theme.link_width);
		terminals.push((from, color));
		terminals.push((to, color));
		stats.links += 1;
	}

	surface.set_alpha(GROUP_ALPHA);
	for (index, group) in frame.snapshot.groups.iter().enumerate() {
		if !group.has_geometry() {
			stats.skipped.push(MinimapError::MalformedGroup(index));
			continue;
		}
		let rect = transform.rect_to_surface(Rect::new(
			group.pos[0],
			group.pos[1],
			group.size[0],
			group.size[1],
		));
		let color = group
			.color
			.as_deref()
			.filter(|c| !c.is_empty())
			.unwrap_or(theme.group_fallback.as_str());
		surface.fill_rect(rect, color);
		stats.groups += 1;
	}
	surface.set_alpha(1.0);

	for node in &frame.snapshot.nodes {
		if !node.has_geometry() {
			stats.skipped.push(MinimapError::MalformedNode(node.id));
			continue;
		}
		draw_node(surface, frame, transform, node);
		stats.nodes += 1;
	}

	if transform.scale > frame.config.terminal_dot_scale {
		let mut seen = HashSet::new();
		for (point, color) in terminals {
			let Some(key) = terminal_key(point) else {
				continue;
			};
			if seen.insert(key) {
				surface.dot(point, TERMINAL_RADIUS, color);
				stats.terminals += 1;
			}
		}
	}
	stats
}

/// Dedup key at 0.01 px. `None` for points the cast could not represent
/// exactly; such points are far off the surface anyway.
fn terminal_key((x, y): (f64, f64)) -> Option<(i64, i64)> {
	const LIMIT: f64 = (1u64 << 53) as f64;
	let (kx, ky) = ((x * 100.0).round(), (y * 100.0).round());
	(kx.abs() < LIMIT && ky.abs() < LIMIT).then_some((kx as i64, ky as i64))
}

fn draw_node<S: Surface + ?Sized>(
	surface: &mut S,
	frame: &Frame,
	transform: Transform,
	node: &GraphNode,
) {
	let theme = &frame.config.theme;
	let rect = transform.rect_to_surface(node_rect(node));
	let class = classify(node, &frame.config.classifier);
	surface.fill_rect(rect, node_fill(node, class, theme));

	let min = frame.config.preview_min_size;
	if rect.w >= min && rect.h >= min {
		if let Some(image) = frame.preview.preview(node) {
			surface.image(&image, rect);
		}
	}

	if class.is_error {
		surface.stroke_rect(rect, &theme.error_outline, theme.error_outline_width);
	}
	if frame.executing == Some(node.id) {
		surface.stroke_rect(rect, &theme.active_outline, theme.active_outline_width);
	}
}

/// Error beats bypass; otherwise the node's own color.
pub fn node_fill<'a>(node: &'a GraphNode, class: NodeClass, theme: &'a Theme) -> &'a str {
	if class.is_error {
		theme.error_fill.as_str()
	} else if class.is_bypassed {
		theme.bypass_fill.as_str()
	} else {
		node.color
			.as_deref()
			.filter(|c| !c.is_empty())
			.unwrap_or(theme.node_fallback.as_str())
	}
}

/// Graph-space box of a node including its title bar.
pub fn node_rect(node: &GraphNode) -> Rect {
	let [x, y] = node.pos;
	let [w, h] = node.size;
	if node.collapsed {
		let width = node
			.collapsed_width
			.filter(|w| w.is_finite() && *w > 0.0)
			.unwrap_or(COLLAPSED_WIDTH);
		Rect::new(x, y - TITLE_HEIGHT, width, TITLE_HEIGHT)
	} else if node.is_virtual {
		Rect::new(x, y, w, h)
	} else {
		Rect::new(x, y - TITLE_HEIGHT, w, h + TITLE_HEIGHT)
	}
}

fn anchor_y(node: &GraphNode, slot: usize) -> f64 {
	if node.collapsed {
		node.pos[1] - TITLE_HEIGHT * 0.5
	} else if node.is_virtual {
		node.pos[1] + node.size[1] * 0.5
	} else {
		node.pos[1] + SLOT_OFFSET + slot as f64 * SLOT_SPACING
	}
}

pub fn output_anchor(node: &GraphNode, slot: usize) -> Option<(f64, f64)> {
	let point = (node_rect(node).right() - ANCHOR_INSET, anchor_y(node, slot));
	finite(point)
}

pub fn input_anchor(node: &GraphNode, slot: usize) -> Option<(f64, f64)> {
	finite((node.pos[0], anchor_y(node, slot)))
}

fn finite(point: (f64, f64)) -> Option<(f64, f64)> {
	(point.0.is_finite() && point.1.is_finite()).then_some(point)
}

type Anchors = ((f64, f64), (f64, f64));

fn link_anchors(
	nodes: &HashMap<NodeId, &GraphNode>,
	index: usize,
	link: &GraphLink,
) -> Result<Anchors, MinimapError> {
	let resolve = |id: NodeId| {
		nodes
			.get(&id)
			.copied()
			.ok_or(MinimapError::UnresolvedLink { index, missing: id })
	};
	let (origin, target) = (resolve(link.origin)?, resolve(link.target)?);
	match (
		output_anchor(origin, link.origin_slot),
		input_anchor(target, link.target_slot),
	) {
		(Some(from), Some(to)) => Ok((from, to)),
		(None, _) => Err(MinimapError::MalformedNode(origin.id)),
		(_, None) => Err(MinimapError::MalformedNode(target.id)),
	}
}
