use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::error::MinimapError;
use super::types::Rect;

/// The drawing operations the minimap needs, in surface pixels.
pub trait Surface {
	fn size(&self) -> (f64, f64);
	fn clear(&mut self);
	fn set_alpha(&mut self, alpha: f64);
	fn fill_rect(&mut self, rect: Rect, color: &str);
	fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64);
	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
	fn dot(&mut self, center: (f64, f64), radius: f64, color: &str);
	fn image(&mut self, image: &HtmlImageElement, rect: Rect) -> bool;
}

pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
		Self { ctx, width, height }
	}

	/// Fails with [`MinimapError::MissingSurface`] when no 2D context exists.
	pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, MinimapError> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
			.ok_or(MinimapError::MissingSurface)?;
		Ok(Self::new(
			ctx,
			canvas.width() as f64,
			canvas.height() as f64,
		))
	}
}

impl Surface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn clear(&mut self) {
		self.ctx.set_global_alpha(1.0);
		self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
	}

	fn set_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn fill_rect(&mut self, rect: Rect, color: &str) {
		self.ctx.set_fill_style_str(color);
		self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
	}

	fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
	}

	fn dot(&mut self, center: (f64, f64), radius: f64, color: &str) {
		self.ctx.set_fill_style_str(color);
		self.ctx.begin_path();
		let _ = self
			.ctx
			.arc(center.0, center.1, radius, 0.0, 2.0 * std::f64::consts::PI);
		self.ctx.fill();
	}

	fn image(&mut self, image: &HtmlImageElement, rect: Rect) -> bool {
		if !image.complete() || image.natural_width() == 0 {
			return false;
		}
		self.ctx
			.draw_image_with_html_image_element_and_dw_and_dh(image, rect.x, rect.y, rect.w, rect.h)
			.is_ok()
	}
}

#[cfg(test)]
pub(crate) mod recording {
	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	pub enum Op {
		Clear,
		Alpha(f64),
		Fill(Rect, String),
		Stroke(Rect, String, f64),
		Line((f64, f64), (f64, f64), String),
		Dot((f64, f64), String),
	}

	/// Surface that records every call for assertions.
	pub struct RecordingSurface {
		pub width: f64,
		pub height: f64,
		pub ops: Vec<Op>,
	}

	impl RecordingSurface {
		pub fn new(width: f64, height: f64) -> Self {
			Self {
				width,
				height,
				ops: Vec::new(),
			}
		}

		pub fn lines(&self) -> Vec<&Op> {
			self.ops.iter().filter(|o| matches!(o, Op::Line(..))).collect()
		}

		pub fn dots(&self) -> Vec<&Op> {
			self.ops.iter().filter(|o| matches!(o, Op::Dot(..))).collect()
		}

		pub fn fills(&self) -> Vec<(Rect, &str)> {
			self.ops
				.iter()
				.filter_map(|o| match o {
					Op::Fill(r, c) => Some((*r, c.as_str())),
					_ => None,
				})
				.collect()
		}

		pub fn strokes(&self) -> Vec<(Rect, &str, f64)> {
			self.ops
				.iter()
				.filter_map(|o| match o {
					Op::Stroke(r, c, w) => Some((*r, c.as_str(), *w)),
					_ => None,
				})
				.collect()
		}
	}

	impl Surface for RecordingSurface {
		fn size(&self) -> (f64, f64) {
			(self.width, self.height)
		}

		fn clear(&mut self) {
			self.ops.push(Op::Clear);
		}

		fn set_alpha(&mut self, alpha: f64) {
			self.ops.push(Op::Alpha(alpha));
		}

		fn fill_rect(&mut self, rect: Rect, color: &str) {
			self.ops.push(Op::Fill(rect, color.to_owned()));
		}

		fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64) {
			self.ops.push(Op::Stroke(rect, color.to_owned(), width));
		}

		fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, _width: f64) {
			self.ops.push(Op::Line(from, to, color.to_owned()));
		}

		fn dot(&mut self, center: (f64, f64), _radius: f64, color: &str) {
			self.ops.push(Op::Dot(center, color.to_owned()));
		}

		fn image(&mut self, _image: &HtmlImageElement, _rect: Rect) -> bool {
			false
		}
	}
}
