use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::config::Palette;
use super::error::EngineError;
use super::physics;
use super::render::{self, Surface};
use super::types::Graph;

/// The host's per-refresh callback primitive.
pub trait FrameScheduler {
	type Handle: 'static;

	/// Runs `tick` once, on the next refresh.
	fn request(&self, tick: Box<dyn FnOnce()>) -> Result<Self::Handle, EngineError>;
	/// Withdraws a request. Hosts that cannot withdraw may still run it.
	fn cancel(&self, handle: Self::Handle);
}

struct PendingTick {
	handle: i32,
	fired: Rc<Cell<bool>>,
	_callback: Closure<dyn FnMut()>,
}

/// `requestAnimationFrame` on a browser window.
pub struct RafScheduler {
	window: Window,
	ticks: RefCell<Vec<PendingTick>>,
}

impl RafScheduler {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			ticks: RefCell::new(Vec::new()),
		}
	}
}

impl FrameScheduler for RafScheduler {
	type Handle = i32;

	fn request(&self, tick: Box<dyn FnOnce()>) -> Result<i32, EngineError> {
		let fired = Rc::new(Cell::new(false));
		let (flag, mut tick) = (fired.clone(), Some(tick));
		let callback = Closure::<dyn FnMut()>::new(move || {
			flag.set(true);
			if let Some(tick) = tick.take() {
				tick();
			}
		});
		let handle = self
			.window
			.request_animation_frame(callback.as_ref().unchecked_ref())
			.map_err(|_| EngineError::Schedule)?;

		// Requests come from inside the firing tick; wasm-bindgen defers
		// freeing that closure until it returns.
		let mut ticks = self.ticks.borrow_mut();
		ticks.retain(|t| !t.fired.get());
		ticks.push(PendingTick {
			handle,
			fired,
			_callback: callback,
		});
		Ok(handle)
	}

	fn cancel(&self, handle: i32) {
		if let Err(err) = self.window.cancel_animation_frame(handle) {
			debug!("cancelAnimationFrame({}) failed: {:?}", handle, err);
		}
		self.ticks.borrow_mut().retain(|t| t.handle != handle);
	}
}

struct Scene<S> {
	graph: Graph,
	surface: S,
}

struct LoopState<S, H> {
	scene: Option<Scene<S>>,
	palette: Palette,
	running: bool,
	/// Bumped by every stop(); ticks requested under an older value are dead.
	generation: u64,
	pending: Option<H>,
	frames: u64,
}

struct Shared<S, F: FrameScheduler> {
	this: Weak<Shared<S, F>>,
	scheduler: F,
	state: RefCell<LoopState<S, F::Handle>>,
}

impl<S: Surface + 'static, F: FrameScheduler + 'static> Shared<S, F> {
	fn schedule(&self, generation: u64) -> Result<F::Handle, EngineError> {
		let weak = self.this.clone();
		self.scheduler.request(Box::new(move || {
			if let Some(shared) = weak.upgrade() {
				shared.frame(generation);
			}
		}))
	}

	fn frame(&self, generation: u64) {
		let mut state = self.state.borrow_mut();
		// A tick the scheduler could not withdraw lands here after stop().
		if !state.running || state.generation != generation {
			return;
		}
		state.pending = None;
		let LoopState { scene, palette, .. } = &mut *state;
		if let Some(Scene { graph, surface }) = scene {
			physics::step(graph);
			render::draw(graph, palette, surface);
		}
		state.frames += 1;

		match self.schedule(generation) {
			Ok(handle) => state.pending = Some(handle),
			Err(err) => {
				warn!("neural graph animation halted: {}", err);
				state.running = false;
			}
		}
	}
}

/// Integrate-then-draw on every display refresh, until stopped.
///
/// The loop owns its graph and surface. Callers swap in a new graph with
/// `stop()` followed by `start()`; a running loop is never handed a graph
/// that is still being built.
pub struct AnimationLoop<S: Surface + 'static, F: FrameScheduler + 'static> {
	shared: Rc<Shared<S, F>>,
}

impl<S: Surface + 'static, F: FrameScheduler + 'static> AnimationLoop<S, F> {
	pub fn new(scheduler: F, palette: Palette) -> Self {
		let shared = Rc::new_cyclic(|this| Shared {
			this: this.clone(),
			scheduler,
			state: RefCell::new(LoopState {
				scene: None,
				palette,
				running: false,
				generation: 0,
				pending: None,
				frames: 0,
			}),
		});
		Self { shared }
	}

	/// Hands the loop a graph and surface and begins ticking. On a loop that
	/// is already running the scene is replaced and the pending tick kept.
	pub fn start(&self, graph: Graph, surface: S) {
		let mut state = self.shared.state.borrow_mut();
		state.scene = Some(Scene { graph, surface });
		if state.running {
			return;
		}
		match self.shared.schedule(state.generation) {
			Ok(handle) => {
				state.pending = Some(handle);
				state.running = true;
			}
			Err(err) => warn!("neural graph animation not started: {}", err),
		}
	}

	/// No tick runs after this returns.
	pub fn stop(&self) {
		let mut state = self.shared.state.borrow_mut();
		state.running = false;
		state.generation += 1;
		if let Some(handle) = state.pending.take() {
			self.shared.scheduler.cancel(handle);
		}
	}

	#[cfg(test)]
	fn is_running(&self) -> bool {
		self.shared.state.borrow().running
	}

	#[cfg(test)]
	fn frames(&self) -> u64 {
		self.shared.state.borrow().frames
	}

	#[cfg(test)]
	fn with_graph<T>(&self, f: impl FnOnce(&Graph) -> T) -> Option<T> {
		let state = self.shared.state.borrow();
		state.scene.as_ref().map(|scene| f(&scene.graph))
	}
}

impl<S: Surface + 'static, F: FrameScheduler + 'static> Drop for AnimationLoop<S, F> {
	fn drop(&mut self) {
		self.stop();
	}
}
