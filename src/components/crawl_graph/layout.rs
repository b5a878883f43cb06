//! Layout solver: maps a snapshot onto canvas coordinates.
//!
//! Both algorithms are synchronous and return a map keyed by exactly the
//! snapshot's node ids. The force simulation is O(n²) per iteration and is
//! meant for graphs of a few hundred nodes at most.

use std::collections::HashMap;
use std::f64::consts::PI;

use rand::Rng;
use serde::Deserialize;

use super::types::{GraphEdge, GraphNode, GraphSnapshot};

/// Distance kept between the circle and the canvas edge.
pub const CIRCLE_MARGIN: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
	#[default]
	Force,
	Circular,
}

impl LayoutMode {
	pub fn as_str(self) -> &'static str {
		match self {
			LayoutMode::Force => "force",
			LayoutMode::Circular => "circular",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Position) -> f64 {
		((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
	}
}

pub type PositionMap = HashMap<String, Position>;

/// Constants of the force simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceParams {
	pub iterations: usize,
	pub force_charge: f64,
	pub force_spring: f64,
	pub damping_factor: f64,
	/// Minimum distance kept from every canvas edge.
	pub padding: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			iterations: 100,
			force_charge: 50.0,
			force_spring: 0.01,
			damping_factor: 0.9,
			padding: 20.0,
		}
	}
}

/// Places node `i` at angle `2πi/n` on a circle centred in the canvas.
pub fn circular_layout(nodes: &[GraphNode], width: f64, height: f64) -> PositionMap {
	let n = nodes.len();
	let radius = width.min(height) / 2.0 - CIRCLE_MARGIN;
	let (cx, cy) = (width / 2.0, height / 2.0);

	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let angle = 2.0 * PI * i as f64 / n as f64;
			let pos = Position::new(cx + radius * angle.cos(), cy + radius * angle.sin());
			(node.id.clone(), pos)
		})
		.collect()
}

#[derive(Clone, Copy, Debug, Default)]
struct Body {
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
}

/// Fixed-step spring/charge simulation from a random start.
///
/// Velocities live only for the duration of the call. Edges with an
/// endpoint outside `nodes` contribute nothing.
pub fn force_layout<R: Rng>(
	nodes: &[GraphNode],
	edges: &[GraphEdge],
	width: f64,
	height: f64,
	params: &ForceParams,
	rng: &mut R,
) -> PositionMap {
	if nodes.is_empty() {
		return PositionMap::new();
	}

	let mut bodies: Vec<Body> = nodes
		.iter()
		.map(|_| Body {
			x: rng.gen_range(0.0..=width.max(0.0)),
			y: rng.gen_range(0.0..=height.max(0.0)),
			..Body::default()
		})
		.collect();

	let index: HashMap<&str, usize> =
		nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();
	let springs: Vec<(usize, usize)> = edges
		.iter()
		.filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
		.collect();

	// Keep the clamp range well-formed on canvases narrower than the padding.
	let (min_x, max_x) = bounds(params.padding, width);
	let (min_y, max_y) = bounds(params.padding, height);

	for _ in 0..params.iterations {
		for p in 0..bodies.len() {
			for q in 0..bodies.len() {
				if p == q {
					continue;
				}
				let (dx, dy) = (bodies[q].x - bodies[p].x, bodies[q].y - bodies[p].y);
				let dist = (dx * dx + dy * dy).sqrt().max(1.0);
				let force = params.force_charge / (dist * dist);
				bodies[p].vx -= dx / dist * force;
				bodies[p].vy -= dy / dist * force;
			}
		}

		for &(s, t) in &springs {
			let (dx, dy) = (bodies[t].x - bodies[s].x, bodies[t].y - bodies[s].y);
			let dist = (dx * dx + dy * dy).sqrt().max(1.0);
			let force = dist * params.force_spring;
			let (fx, fy) = (dx / dist * force, dy / dist * force);
			bodies[s].vx += fx;
			bodies[s].vy += fy;
			bodies[t].vx -= fx;
			bodies[t].vy -= fy;
		}

		for b in &mut bodies {
			b.x += b.vx;
			b.y += b.vy;
			b.vx *= params.damping_factor;
			b.vy *= params.damping_factor;
			b.x = b.x.clamp(min_x, max_x);
			b.y = b.y.clamp(min_y, max_y);
		}
	}

	nodes
		.iter()
		.zip(bodies)
		.map(|(node, b)| (node.id.clone(), Position::new(b.x, b.y)))
		.collect()
}

fn bounds(padding: f64, extent: f64) -> (f64, f64) {
	let lo = padding;
	let hi = extent - padding;
	if hi < lo {
		let mid = extent / 2.0;
		(mid, mid)
	} else {
		(lo, hi)
	}
}

/// Full recompute for `mode`.
pub fn compute_layout<R: Rng>(
	mode: LayoutMode,
	snapshot: &GraphSnapshot,
	width: f64,
	height: f64,
	params: &ForceParams,
	rng: &mut R,
) -> PositionMap {
	match mode {
		LayoutMode::Circular => circular_layout(&snapshot.nodes, width, height),
		LayoutMode::Force => {
			force_layout(&snapshot.nodes, &snapshot.edges, width, height, params, rng)
		}
	}
}
