//! Dragging on the minimap pans the main view.

use super::scale::Transform;

/// Pointer button and modifier state of a press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerPress {
	pub button: i16,
	pub ctrl: bool,
	pub shift: bool,
	pub alt: bool,
	pub meta: bool,
}

impl PointerPress {
	fn starts_drag(&self) -> bool {
		self.button == 0 && !(self.ctrl || self.shift || self.alt || self.meta)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging {
		start_pointer: (f64, f64),
		start_offset: [f64; 2],
	},
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
	state: DragState,
}

impl DragController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.state, DragState::Dragging { .. })
	}

	/// `pointer` is surface-local. Returns whether a drag started.
	pub fn pointer_down(
		&mut self,
		press: PointerPress,
		pointer: (f64, f64),
		view_offset: [f64; 2],
	) -> bool {
		if self.is_dragging() || !press.starts_drag() {
			return false;
		}
		self.state = DragState::Dragging {
			start_pointer: pointer,
			start_offset: view_offset,
		};
		true
	}

	/// New main-view offset for the pointer at `pointer`, or `None` when idle
	/// or no transform has been published yet.
	pub fn pointer_move(
		&self,
		pointer: (f64, f64),
		transform: Option<Transform>,
	) -> Option<[f64; 2]> {
		let DragState::Dragging {
			start_pointer,
			start_offset,
		} = self.state
		else {
			return None;
		};
		let transform = transform.filter(|t| t.scale > 0.0)?;
		let (x0, y0) = transform.to_graph(start_pointer.0, start_pointer.1);
		let (x1, y1) = transform.to_graph(pointer.0, pointer.1);
		Some([start_offset[0] - (x1 - x0), start_offset[1] - (y1 - y0)])
	}

	/// Pointer up or leave.
	pub fn release(&mut self) {
		self.state = DragState::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at_scale(scale: f64) -> Option<Transform> {
		Some(Transform {
			scale,
			..Transform::IDENTITY
		})
	}

	#[test]
	fn test_drag_pans_against_pointer() {
		let mut drag = DragController::new();
		assert!(drag.pointer_down(PointerPress::default(), (50.0, 50.0), [100.0, 100.0]));
		assert_eq!(
			drag.pointer_move((70.0, 60.0), at_scale(0.5)),
			Some([60.0, 80.0])
		);
	}

	#[test]
	fn test_move_is_relative_to_press_not_previous_move() {
		let mut drag = DragController::new();
		drag.pointer_down(PointerPress::default(), (0.0, 0.0), [0.0, 0.0]);
		drag.pointer_move((10.0, 0.0), at_scale(1.0));
		assert_eq!(drag.pointer_move((20.0, 0.0), at_scale(1.0)), Some([-20.0, 0.0]));
	}

	#[test]
	fn test_secondary_button_or_modifier_does_not_start() {
		let mut drag = DragController::new();
		let right = PointerPress {
			button: 2,
			..PointerPress::default()
		};
		assert!(!drag.pointer_down(right, (0.0, 0.0), [0.0, 0.0]));
		let shifted = PointerPress {
			shift: true,
			..PointerPress::default()
		};
		assert!(!drag.pointer_down(shifted, (0.0, 0.0), [0.0, 0.0]));
		assert_eq!(drag.state, DragState::Idle);
	}

	#[test]
	fn test_second_press_keeps_original_anchor() {
		let mut drag = DragController::new();
		drag.pointer_down(PointerPress::default(), (0.0, 0.0), [5.0, 5.0]);
		assert!(!drag.pointer_down(PointerPress::default(), (30.0, 30.0), [9.0, 9.0]));
		assert_eq!(
			drag.state,
			DragState::Dragging {
				start_pointer: (0.0, 0.0),
				start_offset: [5.0, 5.0]
			}
		);
	}

	#[test]
	fn test_idle_or_unpublished_transform_yields_nothing() {
		let mut drag = DragController::new();
		assert_eq!(drag.pointer_move((1.0, 1.0), at_scale(1.0)), None);
		drag.pointer_down(PointerPress::default(), (0.0, 0.0), [0.0, 0.0]);
		assert_eq!(drag.pointer_move((1.0, 1.0), None), None);
		assert!(drag.is_dragging());
	}

	#[test]
	fn test_release_ends_drag() {
		let mut drag = DragController::new();
		drag.pointer_down(PointerPress::default(), (0.0, 0.0), [0.0, 0.0]);
		drag.release();
		assert!(!drag.is_dragging());
		drag.release();
		assert_eq!(drag.state, DragState::Idle);
	}
}
