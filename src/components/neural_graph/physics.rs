use super::types::Graph;

/// Advances every node by one frame of velocity. A node that ends up past an
/// edge has that axis' velocity flipped but keeps its overshot position; it
/// drifts back in on the following frames.
pub fn step(graph: &mut Graph) {
	let bounds = graph.bounds();
	for node in graph.nodes_mut() {
		node.x += node.vx;
		node.y += node.vy;

		if node.x < 0.0 || node.x > bounds.width {
			node.vx = -node.vx;
		}
		if node.y < 0.0 || node.y > bounds.height {
			node.vy = -node.vy;
		}
	}
}
