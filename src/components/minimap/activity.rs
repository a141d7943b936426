//! Inactivity fade of the overlay.
//!
//! Only two opacities are ever produced; the canvas style transition does the
//! animation in between.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
	Visible,
	Fading,
}

#[derive(Clone, Debug)]
pub struct ActivityTracker {
	fade_delay_ms: f64,
	last_activity_ms: f64,
	visibility: Visibility,
}

impl ActivityTracker {
	pub fn new(fade_delay_ms: f64, now_ms: f64) -> Self {
		Self {
			fade_delay_ms,
			last_activity_ms: now_ms,
			visibility: Visibility::Visible,
		}
	}

	pub fn opacity(&self) -> f64 {
		match self.visibility {
			Visibility::Visible => 1.0,
			Visibility::Fading => 0.0,
		}
	}

	/// Interaction on the main view. Returns the opacity when it changed.
	pub fn record_activity(&mut self, now_ms: f64) -> Option<f64> {
		self.last_activity_ms = now_ms;
		self.transition(Visibility::Visible)
	}

	/// Periodic check. Returns the opacity when it changed.
	pub fn check(&mut self, now_ms: f64) -> Option<f64> {
		let elapsed = now_ms - self.last_activity_ms;
		if self.visibility == Visibility::Visible && elapsed > self.fade_delay_ms {
			return self.transition(Visibility::Fading);
		}
		None
	}

	fn transition(&mut self, to: Visibility) -> Option<f64> {
		if self.visibility == to {
			return None;
		}
		self.visibility = to;
		Some(self.opacity())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_starts_visible() {
		let tracker = ActivityTracker::new(3000.0, 0.0);
		assert_eq!(tracker.opacity(), 1.0);
	}

	#[test]
	fn test_fades_only_after_delay() {
		let mut tracker = ActivityTracker::new(3000.0, 0.0);
		tracker.record_activity(1000.0);
		assert_eq!(tracker.check(3500.0), None);
		assert_eq!(tracker.check(4000.0), None);
		assert_eq!(tracker.check(4001.0), Some(0.0));
		assert_eq!(tracker.visibility, Visibility::Fading);
		assert_eq!(tracker.check(9000.0), None);
	}

	#[test]
	fn test_activity_restores_and_resets_timer() {
		let mut tracker = ActivityTracker::new(3000.0, 0.0);
		assert_eq!(tracker.check(3500.0), Some(0.0));
		assert_eq!(tracker.record_activity(4000.0), Some(1.0));
		assert_eq!(tracker.opacity(), 1.0);
		assert_eq!(tracker.check(6500.0), None);
		assert_eq!(tracker.record_activity(6500.0), None);
		assert_eq!(tracker.check(9000.0), None);
		assert_eq!(tracker.check(9501.0), Some(0.0));
	}
}
