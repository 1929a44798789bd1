use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::{GlowStyle, Palette, StrokeStyle};
use super::types::{Bounds, Graph};

/// How far past a node's radius its gradient keeps fading.
pub const GLOW_SPREAD: f64 = 2.0;

/// The 2d drawing operations a frame needs.
pub trait Surface {
	fn clear(&mut self, bounds: Bounds);
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), style: &StrokeStyle);
	/// Fills a disc of `radius` with a gradient that goes from `glow.core` at
	/// the centre to transparent at `fade_radius`.
	fn fill_glow(&mut self, center: (f64, f64), radius: f64, fade_radius: f64, glow: &GlowStyle);
}

/// Draws one frame: clear, every edge, then every node on top.
pub fn draw<S: Surface + ?Sized>(graph: &Graph, palette: &Palette, surface: &mut S) {
	surface.clear(graph.bounds());
	draw_edges(graph, palette, surface);
	draw_nodes(graph, palette, surface);
}

fn draw_edges<S: Surface + ?Sized>(graph: &Graph, palette: &Palette, surface: &mut S) {
	let nodes = graph.nodes();
	for edge in graph.edges() {
		let (Some(n1), Some(n2)) = (nodes.get(edge.source), nodes.get(edge.target)) else {
			continue;
		};
		let style = palette.edge(n1.active && n2.active);
		surface.stroke_line((n1.x, n1.y), (n2.x, n2.y), style);
	}
}

fn draw_nodes<S: Surface + ?Sized>(graph: &Graph, palette: &Palette, surface: &mut S) {
	for node in graph.nodes() {
		surface.fill_glow(
			(node.x, node.y),
			node.radius,
			node.radius * GLOW_SPREAD,
			palette.node(node.active),
		);
	}
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, bounds: Bounds) {
		self.clear_rect(0.0, 0.0, bounds.width, bounds.height);
	}

	fn stroke_line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), style: &StrokeStyle) {
		self.begin_path();
		self.move_to(x1, y1);
		self.line_to(x2, y2);
		self.set_stroke_style_str(&style.color.css());
		self.set_line_width(style.width);
		self.stroke();
	}

	fn fill_glow(&mut self, (x, y): (f64, f64), radius: f64, fade_radius: f64, glow: &GlowStyle) {
		let Ok(gradient) = self.create_radial_gradient(x, y, 0.0, x, y, fade_radius) else {
			return;
		};
		if gradient.add_color_stop(0.0, &glow.core.css()).is_err()
			|| gradient
				.add_color_stop(1.0, &glow.core.transparent().css())
				.is_err()
		{
			return;
		}
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.fill();
	}
}
