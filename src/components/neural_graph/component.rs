use leptos::prelude::*;
use log::{debug, warn};
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::animation::{AnimationLoop, RafScheduler};
use super::builder::GraphBuilder;
use super::config::EngineConfig;
use super::error::EngineError;
use super::observer::SizeObserver;
use super::types::{Bounds, Progress};

/// Everything one mounted canvas owns. Field order matters on drop: the
/// observer goes first so no resize can arrive for a dead loop.
struct Engine {
	observer: Option<SizeObserver>,
	animation: AnimationLoop<CanvasRenderingContext2d, RafScheduler>,
	builder: GraphBuilder<SmallRng>,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	size: Bounds,
}

impl Engine {
	fn mount(canvas: HtmlCanvasElement, config: EngineConfig) -> Result<Self, EngineError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or(EngineError::SurfaceUnavailable)?;
		let window = web_sys::window().ok_or(EngineError::SurfaceUnavailable)?;
		let size = canvas
			.parent_element()
			.and_then(|p| Bounds::from_client(p.client_width(), p.client_height()))
			.unwrap_or(Bounds::FALLBACK);
		canvas.set_width(size.width as u32);
		canvas.set_height(size.height as u32);

		Ok(Self {
			observer: None,
			animation: AnimationLoop::new(RafScheduler::new(window), config.palette.clone()),
			builder: GraphBuilder::from_entropy(config),
			canvas,
			ctx,
			size,
		})
	}

	/// Builds the replacement graph completely, then swaps it in.
	fn rebuild(&mut self, progress: Progress) {
		let graph = self.builder.build(self.size, progress);
		debug!(
			"neural graph rebuilt: {} nodes, {} edges, p={:.2} at {}x{}",
			graph.node_count(),
			graph.edge_count(),
			graph.params().activation_probability,
			self.size.width,
			self.size.height,
		);
		self.animation.stop();
		self.animation.start(graph, self.ctx.clone());
	}

	fn resize(&mut self, size: Bounds, progress: Progress) {
		if size == self.size {
			return;
		}
		self.canvas.set_width(size.width as u32);
		self.canvas.set_height(size.height as u32);
		self.size = size;
		self.rebuild(progress);
	}
}

/// Ambient particle graph that grows denser and brighter with the user's
/// level and points. Fills its parent element and draws nothing on failure.
#[component]
pub fn NeuralGraphCanvas(
	#[prop(into)] level: Signal<i64>,
	#[prop(into)] points: Signal<i64>,
	#[prop(optional)] config: EngineConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let engine: StoredValue<Option<Engine>, LocalStorage> = StoredValue::new_local(None);

	Effect::new(move |_| {
		let progress = Progress::new(level.get(), points.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		engine.update_value(|slot| {
			if slot.is_none() {
				match Engine::mount(canvas, config.clone()) {
					Ok(mounted) => *slot = Some(mounted),
					Err(err) => {
						warn!("neural graph disabled: {}", err);
						return;
					}
				}
			}
			let Some(e) = slot else {
				return;
			};
			if e.observer.is_none() {
				e.observer = observe_container(&e.canvas, move |size| {
					let progress = Progress::new(level.get_untracked(), points.get_untracked());
					engine.try_update_value(|slot| {
						if let Some(e) = slot {
							e.resize(size, progress);
						}
					});
				});
			}
			e.rebuild(progress);
		});
	});

	on_cleanup(move || {
		engine.try_update_value(|slot| {
			slot.take();
		});
	});

	view! { <canvas node_ref=canvas_ref class="neural-graph-canvas" /> }
}

fn observe_container(
	canvas: &HtmlCanvasElement,
	on_resize: impl FnMut(Bounds) + 'static,
) -> Option<SizeObserver> {
	let Some(container) = canvas.parent_element() else {
		warn!("neural graph not resizable: {}", EngineError::SurfaceUnavailable);
		return None;
	};
	SizeObserver::observe(&container, on_resize)
		.map_err(|err| warn!("neural graph not resizable: {}", err))
		.ok()
}
