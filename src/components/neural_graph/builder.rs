use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::EngineConfig;
use super::types::{Bounds, Graph, Node, Progress};

/// Builds a fresh [`Graph`] from progress and surface size. The random
/// source is injected so tests can pin it.
pub struct GraphBuilder<R> {
	config: EngineConfig,
	rng: R,
}

impl GraphBuilder<SmallRng> {
	/// Builder with an unseeded generator, for production use.
	pub fn from_entropy(config: EngineConfig) -> Self {
		Self::new(config, SmallRng::seed_from_u64(entropy_seed()))
	}
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
	let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
	let lo = js_sys::Date::now() as u64;
	(hi << 32) ^ lo
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_nanos() as u64)
		.unwrap_or(42)
}

impl<R: Rng> GraphBuilder<R> {
	pub fn new(config: EngineConfig, rng: R) -> Self {
		Self { config, rng }
	}

	pub fn build(&mut self, bounds: Bounds, progress: Progress) -> Graph {
		let params = self.config.params(progress);
		let nodes: Vec<Node> = (0..params.node_count)
			.map(|_| self.spawn_node(bounds, params.activation_probability))
			.collect();
		let adjacency = (0..params.node_count)
			.map(|source| self.connect(source, params.node_count, params.max_connections))
			.collect();
		Graph::new(nodes, adjacency, bounds, params)
	}

	fn spawn_node(&mut self, bounds: Bounds, activation: f64) -> Node {
		let active = self.rng.r#gen::<f64>() < activation;
		let radius = self.config.radius_range(active).at(self.rng.r#gen());
		let speed = self.config.max_speed;
		let (x, y) = (
			self.rng.r#gen::<f64>() * bounds.width,
			self.rng.r#gen::<f64>() * bounds.height,
		);
		let (mut vx, vy) = (
			(self.rng.r#gen::<f64>() - 0.5) * 2.0 * speed,
			(self.rng.r#gen::<f64>() - 0.5) * 2.0 * speed,
		);
		if vx == 0.0 && vy == 0.0 {
			vx = speed;
		}
		Node {
			x,
			y,
			vx,
			vy,
			radius,
			active,
		}
	}

	/// Outgoing targets for `source`. Gives up after a fixed number of
	/// samples, so a node may get fewer links than it drew.
	fn connect(&mut self, source: usize, count: usize, max_connections: usize) -> Vec<usize> {
		if count < 2 {
			return Vec::new();
		}
		let wanted = self.rng.gen_range(1..=max_connections).min(count - 1);
		let mut targets = Vec::with_capacity(wanted);
		let mut attempts = wanted.saturating_mul(self.config.attempts_per_edge.max(1));
		while targets.len() < wanted && attempts > 0 {
			attempts -= 1;
			let target = self.rng.gen_range(0..count);
			if target != source && !targets.contains(&target) {
				targets.push(target);
			}
		}
		targets
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::rngs::mock::StepRng;

	use super::*;

	fn seeded(seed: u64) -> GraphBuilder<SmallRng> {
		GraphBuilder::new(EngineConfig::default(), SmallRng::seed_from_u64(seed))
	}

	fn assert_simple(graph: &Graph) {
		for idx in 0..graph.node_count() {
			let targets = graph.outgoing(idx);
			let unique: HashSet<_> = targets.iter().collect();
			assert_eq!(unique.len(), targets.len(), "duplicate edge from {}", idx);
			assert!(!targets.contains(&idx), "self edge on {}", idx);
			assert!(targets.iter().all(|&t| t < graph.node_count()));
		}
	}

	#[test]
	fn test_level_one_graph() {
		let graph = seeded(7).build(Bounds::new(400.0, 300.0), Progress::new(1, 0));
		assert_eq!(graph.node_count(), 20);
		assert_eq!(graph.params().activation_probability, 0.2);
		for idx in 0..graph.node_count() {
			assert!(graph.outgoing(idx).len() <= 2);
		}
		assert_simple(&graph);
	}

	#[test]
	fn test_no_self_or_duplicate_edges_across_levels() {
		let mut builder = seeded(11);
		for level in 1..=12 {
			for points in [0, 250, 4000] {
				let graph = builder.build(Bounds::new(640.0, 480.0), Progress::new(level, points));
				assert_simple(&graph);
			}
		}
	}

	#[test]
	fn test_full_activation() {
		let graph = seeded(3).build(Bounds::new(200.0, 200.0), Progress::new(5, 5000));
		assert_eq!(graph.params().activation_probability, 1.0);
		assert!(graph.nodes().iter().all(|n| n.active));
		assert!(graph.nodes().iter().all(|n| (2.0..4.0).contains(&n.radius)));
	}

	#[test]
	fn test_zero_activation_radius_range() {
		let config = EngineConfig {
			activation_per_level: 0.0,
			..EngineConfig::default()
		};
		let graph = GraphBuilder::new(config, SmallRng::seed_from_u64(5))
			.build(Bounds::new(200.0, 200.0), Progress::new(3, 0));
		assert!(graph.nodes().iter().all(|n| !n.active));
		assert!(graph.nodes().iter().all(|n| (1.0..2.0).contains(&n.radius)));
	}

	#[test]
	fn test_nodes_start_inside_bounds_and_moving() {
		let bounds = Bounds::new(320.0, 180.0);
		let graph = seeded(99).build(bounds, Progress::new(4, 120));
		for node in graph.nodes() {
			assert!((0.0..bounds.width).contains(&node.x));
			assert!((0.0..bounds.height).contains(&node.y));
			assert!(node.vx.abs() <= 0.25 && node.vy.abs() <= 0.25);
			assert!(node.vx != 0.0 || node.vy != 0.0);
		}
	}

	#[test]
	fn test_rebuild_keeps_derived_scalars() {
		let bounds = Bounds::new(500.0, 500.0);
		let progress = Progress::new(3, 230);
		let a = seeded(1).build(bounds, progress);
		let b = seeded(2).build(bounds, progress);
		assert_eq!(a.node_count(), b.node_count());
		assert_eq!(a.params(), b.params());
	}

	#[test]
	fn test_same_seed_same_graph() {
		let bounds = Bounds::new(500.0, 500.0);
		let progress = Progress::new(2, 40);
		assert_eq!(seeded(42).build(bounds, progress), seeded(42).build(bounds, progress));
	}

	#[test]
	fn test_sampling_terminates_on_constant_source() {
		// A stuck generator keeps proposing the same target; the retry budget
		// has to end the search.
		let mut builder = GraphBuilder::new(EngineConfig::default(), StepRng::new(0, 0));
		let graph = builder.build(Bounds::new(100.0, 100.0), Progress::new(6, 0));
		assert_eq!(graph.node_count(), 45);
		assert_simple(&graph);
		assert!(graph.nodes().iter().all(|n| n.vx != 0.0 || n.vy != 0.0));
	}

	#[test]
	fn test_tiny_graphs() {
		for base in [0, 1, 2] {
			let config = EngineConfig {
				base_count: base,
				per_level: 0,
				..EngineConfig::default()
			};
			let graph = GraphBuilder::new(config, SmallRng::seed_from_u64(base as u64))
				.build(Bounds::new(50.0, 50.0), Progress::new(9, 0));
			assert_eq!(graph.node_count(), base);
			assert_simple(&graph);
			if base == 2 {
				assert!(graph.edge_count() <= 2);
			} else {
				assert_eq!(graph.edge_count(), 0);
			}
		}
	}
}
