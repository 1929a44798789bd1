use super::types::{GraphParams, Progress};

/// An `rgba()` colour as the canvas expects it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same hue, zero alpha. Gradients fade into this.
	pub fn transparent(self) -> Self {
		Self { a: 0.0, ..self }
	}

	pub fn css(&self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

const TEAL: Rgba = Rgba::new(45, 212, 191, 1.0);
const PURPLE: Rgba = Rgba::new(99, 102, 241, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
	pub color: Rgba,
	pub width: f64,
}

/// Centre colour of a node's radial gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowStyle {
	pub core: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub active_edge: StrokeStyle,
	pub idle_edge: StrokeStyle,
	pub active_node: GlowStyle,
	pub idle_node: GlowStyle,
}

impl Palette {
	pub fn edge(&self, both_active: bool) -> &StrokeStyle {
		if both_active {
			&self.active_edge
		} else {
			&self.idle_edge
		}
	}

	pub fn node(&self, active: bool) -> &GlowStyle {
		if active {
			&self.active_node
		} else {
			&self.idle_node
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			active_edge: StrokeStyle {
				color: Rgba { a: 0.3, ..TEAL },
				width: 0.8,
			},
			idle_edge: StrokeStyle {
				color: Rgba { a: 0.1, ..PURPLE },
				width: 0.5,
			},
			active_node: GlowStyle {
				core: Rgba { a: 0.9, ..TEAL },
			},
			idle_node: GlowStyle {
				core: Rgba { a: 0.6, ..PURPLE },
			},
		}
	}
}

/// Half-open `[min, max)` interval a node radius is drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusRange {
	pub min: f64,
	pub max: f64,
}

impl RadiusRange {
	/// Maps a unit sample `t` in `[0, 1)` onto the range.
	pub fn at(&self, t: f64) -> f64 {
		self.min + t * (self.max - self.min)
	}
}

/// Tuning for graph construction and drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
	/// Node count is `base_count + level * per_level`.
	pub base_count: usize,
	pub per_level: usize,
	/// Ceiling on the level share of the activation probability.
	pub max_activation_from_level: f64,
	pub activation_per_level: f64,
	/// Points needed to add 1.0 to the activation probability.
	pub points_scale: f64,
	/// Per-axis speed limit, in pixels per frame.
	pub max_speed: f64,
	pub active_radius: RadiusRange,
	pub inactive_radius: RadiusRange,
	/// Target samples allowed per requested edge before a node gives up.
	pub attempts_per_edge: usize,
	pub palette: Palette,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			// 20 nodes at level 1
			base_count: 15,
			per_level: 5,
			max_activation_from_level: 0.8,
			activation_per_level: 0.2,
			points_scale: 5000.0,
			max_speed: 0.25,
			active_radius: RadiusRange { min: 2.0, max: 4.0 },
			inactive_radius: RadiusRange { min: 1.0, max: 2.0 },
			attempts_per_edge: 4,
			palette: Palette::default(),
		}
	}
}

impl EngineConfig {
	pub fn node_count(&self, level: u32) -> usize {
		self.base_count
			.saturating_add((level as usize).saturating_mul(self.per_level))
	}

	pub fn activation_probability(&self, progress: Progress) -> f64 {
		let from_level = (progress.level() as f64 * self.activation_per_level)
			.min(self.max_activation_from_level);
		let from_points = if self.points_scale > 0.0 {
			progress.points() as f64 / self.points_scale
		} else {
			0.0
		};
		(from_level + from_points).clamp(0.0, 1.0)
	}

	pub fn max_connections(&self, level: u32) -> usize {
		(level as usize).max(2)
	}

	pub fn params(&self, progress: Progress) -> GraphParams {
		GraphParams {
			node_count: self.node_count(progress.level()),
			activation_probability: self.activation_probability(progress),
			max_connections: self.max_connections(progress.level()),
		}
	}

	pub fn radius_range(&self, active: bool) -> RadiusRange {
		if active {
			self.active_radius
		} else {
			self.inactive_radius
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_node_count_formula() {
		let config = EngineConfig::default();
		for level in 1..50 {
			assert_eq!(config.node_count(level), 15 + level as usize * 5);
			assert!(config.node_count(level + 1) >= config.node_count(level));
		}
	}

	#[test]
	fn test_level_one_baseline() {
		let params = EngineConfig::default().params(Progress::new(1, 0));
		assert_eq!(params.node_count, 20);
		assert!((params.activation_probability - 0.2).abs() < 1e-12);
		assert_eq!(params.max_connections, 2);
	}

	#[test]
	fn test_activation_saturates_at_one() {
		let params = EngineConfig::default().params(Progress::new(5, 5000));
		assert_eq!(params.activation_probability, 1.0);
	}

	#[test]
	fn test_activation_monotonic_and_bounded() {
		let config = EngineConfig::default();
		let levels = [1_i64, 2, 3, 4, 5, 8, 100];
		let points = [0_i64, 1, 100, 999, 2500, 4999, 5000, 10_000, 1_000_000];
		for (li, &level) in levels.iter().enumerate() {
			for (pi, &pts) in points.iter().enumerate() {
				let p = config.activation_probability(Progress::new(level, pts));
				assert!((0.0..=1.0).contains(&p), "p={} out of range", p);
				if li > 0 {
					let prev = config.activation_probability(Progress::new(levels[li - 1], pts));
					assert!(p >= prev, "not monotonic in level at {}/{}", level, pts);
				}
				if pi > 0 {
					let prev = config.activation_probability(Progress::new(level, points[pi - 1]));
					assert!(p >= prev, "not monotonic in points at {}/{}", level, pts);
				}
			}
		}
	}

	#[test]
	fn test_max_connections_floor() {
		let config = EngineConfig::default();
		assert_eq!(config.max_connections(1), 2);
		assert_eq!(config.max_connections(2), 2);
		assert_eq!(config.max_connections(7), 7);
	}

	#[test]
	fn test_rgba_css() {
		let c = Rgba::new(45, 212, 191, 0.9);
		assert_eq!(c.css(), "rgba(45, 212, 191, 0.9)");
		assert_eq!(c.transparent().css(), "rgba(45, 212, 191, 0)");
	}

	#[test]
	fn test_palette_picks_by_activation() {
		let palette = Palette::default();
		assert!(palette.edge(true).width > palette.edge(false).width);
		assert!(palette.edge(true).color.a > palette.edge(false).color.a);
		assert_eq!(palette.node(true).core.r, 45);
		assert_eq!(palette.node(false).core.r, 99);
	}
}
