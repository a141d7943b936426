use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;

pub type TaskHandle = i32;

/// Source of repeating timers.
pub trait IntervalDriver {
	fn start(&self, period_ms: i32, task: Box<dyn FnMut()>) -> Option<TaskHandle>;
	fn cancel(&self, handle: TaskHandle);
}

/// `setInterval`/`clearInterval` on the window. Keeps each callback alive
/// until its interval is cleared.
#[derive(Default)]
pub struct WindowIntervals {
	callbacks: RefCell<HashMap<TaskHandle, Closure<dyn FnMut()>>>,
}

impl IntervalDriver for WindowIntervals {
	fn start(&self, period_ms: i32, task: Box<dyn FnMut()>) -> Option<TaskHandle> {
		let window = web_sys::window()?;
		let callback = Closure::wrap(task);
		let handle = window
			.set_interval_with_callback_and_timeout_and_arguments_0(
				callback.as_ref().unchecked_ref(),
				period_ms,
			)
			.ok()?;
		self.callbacks.borrow_mut().insert(handle, callback);
		Some(handle)
	}

	fn cancel(&self, handle: TaskHandle) {
		if let Some(window) = web_sys::window() {
			window.clear_interval_with_handle(handle);
		}
		self.callbacks.borrow_mut().remove(&handle);
	}
}

/// Owns a set of periodic tasks; stopping is idempotent and happens on drop.
pub struct Scheduler {
	driver: Rc<dyn IntervalDriver>,
	tasks: Vec<TaskHandle>,
}

impl Scheduler {
	pub fn new(driver: Rc<dyn IntervalDriver>) -> Self {
		Self {
			driver,
			tasks: Vec::new(),
		}
	}

	pub fn every(&mut self, period_ms: i32, task: impl FnMut() + 'static) -> bool {
		match self.driver.start(period_ms.max(1), Box::new(task)) {
			Some(handle) => {
				self.tasks.push(handle);
				true
			}
			None => {
				warn!("minimap: could not schedule a {period_ms}ms task");
				false
			}
		}
	}

	pub fn is_running(&self) -> bool {
		!self.tasks.is_empty()
	}

	pub fn stop(&mut self) {
		for handle in self.tasks.drain(..) {
			self.driver.cancel(handle);
		}
	}
}

impl Drop for Scheduler {
	fn drop(&mut self) {
		self.stop();
	}
}
