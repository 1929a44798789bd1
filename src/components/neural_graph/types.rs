/// Pixel extent of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	/// Used when the container reports no size at mount.
	pub const FALLBACK: Bounds = Bounds {
		width: 800.0,
		height: 600.0,
	};

	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
		}
	}

	/// Size from a container's client box. A collapsed container has nothing
	/// to draw on.
	pub fn from_client(width: i32, height: i32) -> Option<Self> {
		(width > 0 && height > 0).then(|| Self::new(width as f64, height as f64))
	}
}

/// Level and points as the host dashboard reports them, clamped to legal
/// values (`level >= 1`, `points >= 0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Progress {
	level: u32,
	points: u64,
}

impl Progress {
	pub fn new(level: i64, points: i64) -> Self {
		Self {
			level: level.clamp(1, u32::MAX as i64) as u32,
			points: points.max(0) as u64,
		}
	}

	pub fn level(&self) -> u32 {
		self.level
	}

	pub fn points(&self) -> u64 {
		self.points
	}
}

impl Default for Progress {
	fn default() -> Self {
		Self::new(1, 0)
	}
}

/// Scalars derived from [`Progress`] that shape a build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphParams {
	pub node_count: usize,
	pub activation_probability: f64,
	pub max_connections: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub active: bool,
}

/// A directed link between two node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
}

/// Nodes plus per-node outgoing adjacency. Only positions change after a
/// build; the adjacency is fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	adjacency: Vec<Vec<usize>>,
	bounds: Bounds,
	params: GraphParams,
}

impl Graph {
	pub(crate) fn new(
		nodes: Vec<Node>,
		adjacency: Vec<Vec<usize>>,
		bounds: Bounds,
		params: GraphParams,
	) -> Self {
		debug_assert_eq!(nodes.len(), adjacency.len());
		Self {
			nodes,
			adjacency,
			bounds,
			params,
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	#[cfg(test)]
	pub fn outgoing(&self, idx: usize) -> &[usize] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
		self.adjacency.iter().enumerate().flat_map(|(source, targets)| {
			targets.iter().map(move |&target| Edge { source, target })
		})
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.adjacency.iter().map(Vec::len).sum()
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn params(&self) -> GraphParams {
		self.params
	}
}
