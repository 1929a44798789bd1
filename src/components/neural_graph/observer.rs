use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Element, ResizeObserver};

use super::error::EngineError;
use super::types::Bounds;

/// What one resize notification amounts to.
#[derive(Clone, Copy, Debug, PartialEq)]
enum SizeChange {
	Resized(Bounds),
	Unchanged,
	Empty,
	Detached,
	Closed,
}

/// Filters raw container measurements down to real size changes.
#[derive(Debug, Default)]
struct SizeTracker {
	last: Option<Bounds>,
	closed: bool,
}

impl SizeTracker {
	fn measure(&mut self, connected: bool, width: i32, height: i32) -> SizeChange {
		if self.closed {
			return SizeChange::Closed;
		}
		if !connected {
			return SizeChange::Detached;
		}
		let Some(bounds) = Bounds::from_client(width, height) else {
			return SizeChange::Empty;
		};
		if self.last == Some(bounds) {
			return SizeChange::Unchanged;
		}
		self.last = Some(bounds);
		SizeChange::Resized(bounds)
	}

	fn close(&mut self) {
		self.closed = true;
	}
}

/// Reports the container's client size whenever it changes. Dropping it
/// disconnects the browser observer.
pub struct SizeObserver {
	observer: ResizeObserver,
	tracker: Rc<RefCell<SizeTracker>>,
	_callback: Closure<dyn FnMut(js_sys::Array, ResizeObserver)>,
}

impl SizeObserver {
	pub fn observe(
		target: &Element,
		mut on_resize: impl FnMut(Bounds) + 'static,
	) -> Result<Self, EngineError> {
		let tracker = Rc::new(RefCell::new(SizeTracker::default()));
		let (shared, watched) = (tracker.clone(), target.clone());

		let callback = Closure::<dyn FnMut(js_sys::Array, ResizeObserver)>::new(
			move |_entries: js_sys::Array, _observer: ResizeObserver| {
				let change = shared.borrow_mut().measure(
					watched.is_connected(),
					watched.client_width(),
					watched.client_height(),
				);
				match change {
					SizeChange::Resized(bounds) => on_resize(bounds),
					SizeChange::Detached => {
						debug!("neural graph resize skipped: {}", EngineError::ResizeRace)
					}
					SizeChange::Empty => debug!("neural graph container has no size yet"),
					SizeChange::Unchanged | SizeChange::Closed => {}
				}
			},
		);

		let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())
			.map_err(|_| EngineError::Observer)?;
		observer.observe(target);

		Ok(Self {
			observer,
			tracker,
			_callback: callback,
		})
	}
}

impl Drop for SizeObserver {
	fn drop(&mut self) {
		self.tracker.borrow_mut().close();
		self.observer.disconnect();
	}
}
