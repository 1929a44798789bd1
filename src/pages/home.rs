use leptos::prelude::*;

use crate::components::neural_graph::NeuralGraphCanvas;

/// Points between level-ups on the demo dashboard.
const POINTS_PER_LEVEL: i64 = 400;

/// Default Home Page: a stand-in dashboard whose level and points drive the
/// background graph.
#[component]
pub fn Home() -> impl IntoView {
	let (level, set_level) = signal(3_i64);
	let (points, set_points) = signal(230_i64);

	let award = move |amount: i64| {
		let before = points.get_untracked();
		let after = before + amount;
		set_points.set(after);
		if after / POINTS_PER_LEVEL > before / POINTS_PER_LEVEL {
			set_level.update(|l| *l += 1);
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="dashboard">
				<NeuralGraphCanvas level=level points=points />
				<div class="dashboard-overlay">
					<h1>"XENO"</h1>
					<p class="subtitle">
						"Level " {move || level.get()} " · " {move || points.get()} " pts"
					</p>
					<div class="controls">
						<button on:click=move |_| award(10)>"Task +10"</button>
						<button on:click=move |_| award(50)>"Habit +50"</button>
						<button on:click=move |_| award(100)>"Mission +100"</button>
						<button on:click=move |_| set_level.update(|l| *l += 1)>"Level up"</button>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
