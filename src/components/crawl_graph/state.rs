use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::color::DomainPalette;
use super::config::GraphViewConfig;
use super::interaction::{DragState, PointerOutcome, node_at_position};
use super::layout::{LayoutMode, PositionMap, compute_layout};
use super::overlay::CentralityOverlay;
use super::types::{GraphNode, GraphSnapshot, GraphStats, PageRankResponse};

/// Everything the view reacts to. Pointer coordinates are canvas-relative.
#[derive(Clone, Debug)]
pub enum GraphEvent {
	SnapshotLoaded(GraphSnapshot),
	SnapshotFailed,
	StatsLoaded(GraphStats),
	CentralityLoaded(PageRankResponse),
	SetLayout(LayoutMode),
	Resize { width: f64, height: f64 },
	PointerDown { x: f64, y: f64 },
	PointerMove { x: f64, y: f64 },
	PointerUp,
	CloseDetails,
}

/// Session state of the crawl graph view.
///
/// The solver writes `positions` on snapshot load and layout switch only;
/// between those, pointer events may overwrite single entries.
pub struct GraphViewState {
	pub snapshot: GraphSnapshot,
	pub stats: Option<GraphStats>,
	pub positions: PositionMap,
	pub mode: LayoutMode,
	pub overlay: CentralityOverlay,
	pub palette: DomainPalette,
	pub drag: DragState,
	pub selected: Option<String>,
	pub loading: bool,
	pub width: f64,
	pub height: f64,
	config: GraphViewConfig,
	rng: SmallRng,
}

impl GraphViewState {
	pub fn new(config: GraphViewConfig, seed: u64) -> Self {
		Self {
			snapshot: GraphSnapshot::default(),
			stats: None,
			positions: PositionMap::new(),
			mode: LayoutMode::default(),
			overlay: CentralityOverlay::default(),
			palette: DomainPalette::default(),
			drag: DragState::default(),
			selected: None,
			loading: true,
			width: config.width,
			height: config.height,
			config,
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Applies `event`, returning the node the user clicked, if any.
	pub fn update(&mut self, event: GraphEvent) -> Option<GraphNode> {
		match event {
			GraphEvent::SnapshotLoaded(snapshot) => {
				self.palette = DomainPalette::from_nodes(&snapshot.nodes);
				debug!("palette built for {} domains", self.palette.len());
				self.snapshot = snapshot;
				self.selected = None;
				self.loading = false;
				self.relayout();
			}
			GraphEvent::SnapshotFailed => {
				self.snapshot = GraphSnapshot::default();
				self.palette = DomainPalette::default();
				self.positions.clear();
				self.drag.cancel();
				self.selected = None;
				self.loading = false;
			}
			GraphEvent::StatsLoaded(stats) => self.stats = Some(stats),
			GraphEvent::CentralityLoaded(response) => {
				self.overlay.enable(response, &self.snapshot.nodes)
			}
			GraphEvent::SetLayout(mode) => {
				if mode != self.mode {
					self.mode = mode;
					self.relayout();
				}
			}
			GraphEvent::Resize { width, height } => {
				self.width = width;
				self.height = height;
			}
			GraphEvent::PointerDown { x, y } => {
				let hit = node_at_position(&self.snapshot.nodes, &self.positions, &self.overlay, x, y);
				if let PointerOutcome::DragStarted(id) = self.drag.pointer_down(hit, x, y) {
					debug!("pointer down on {id}");
				}
			}
			GraphEvent::PointerMove { x, y } => {
				self.drag
					.pointer_move(&mut self.positions, x, y, self.config.click_slop);
			}
			GraphEvent::PointerUp => {
				match self.drag.pointer_up() {
					PointerOutcome::Clicked(id) => {
						let node = self.snapshot.node(&id).cloned();
						if node.is_some() {
							self.selected = Some(id);
						}
						return node;
					}
					PointerOutcome::Released(id) => debug!("dropped {id}"),
					_ => {}
				}
			}
			GraphEvent::CloseDetails => self.selected = None,
		}
		None
	}

	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.selected.as_deref().and_then(|id| self.snapshot.node(id))
	}

	/// Drops drag overrides and recomputes every position from the snapshot.
	fn relayout(&mut self) {
		self.drag.cancel();
		self.positions = compute_layout(
			self.mode,
			&self.snapshot,
			self.width,
			self.height,
			&self.config.force,
			&mut self.rng,
		);
		debug!(
			"{} layout computed for {} nodes",
			self.mode.as_str(),
			self.positions.len()
		);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::components::crawl_graph::layout::{Position, circular_layout};
	use crate::components::crawl_graph::types::{GraphEdge, PageRankEntry};

	fn snapshot(n: usize) -> GraphSnapshot {
		let nodes: Vec<GraphNode> = (0..n)
			.map(|i| GraphNode {
				id: format!("https://site{}.org/p{i}", i % 3),
				label: format!("Page {i}"),
				domain: format!("site{}.org", i % 3),
				size: (i * 40) as f64,
				url: format!("https://site{}.org/p{i}", i % 3),
				title: format!("Title {i}"),
			})
			.collect();
		let mut edges: Vec<GraphEdge> = nodes
			.windows(2)
			.map(|w| GraphEdge {
				source: w[0].id.clone(),
				target: w[1].id.clone(),
			})
			.collect();
		edges.push(GraphEdge {
			source: nodes[0].id.clone(),
			target: "https://gone.org/".into(),
		});
		GraphSnapshot { nodes, edges }
	}

	fn loaded(mode: LayoutMode) -> GraphViewState {
		let mut state = GraphViewState::new(GraphViewConfig::default(), 17);
		state.update(GraphEvent::SetLayout(mode));
		state.update(GraphEvent::SnapshotLoaded(snapshot(8)));
		state
	}

	fn key_set(state: &GraphViewState) -> HashSet<&str> {
		state.positions.keys().map(String::as_str).collect()
	}

	fn node_set(state: &GraphViewState) -> HashSet<&str> {
		state.snapshot.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn snapshot_load_lays_out_every_node() {
		for mode in [LayoutMode::Force, LayoutMode::Circular] {
			let state = loaded(mode);
			assert!(!state.loading);
			assert_eq!(key_set(&state), node_set(&state));
			assert_eq!(state.palette.len(), 3);
		}
	}

	#[test]
	fn failed_fetch_leaves_empty_state() {
		let mut state = loaded(LayoutMode::Circular);
		state.update(GraphEvent::SnapshotFailed);
		assert!(state.snapshot.nodes.is_empty());
		assert!(state.positions.is_empty());
		assert!(!state.loading);
	}

	#[test]
	fn drag_then_mode_switch_discards_override() {
		let mut state = loaded(LayoutMode::Circular);
		let id = state.snapshot.nodes[0].id.clone();
		let start = state.positions[&id];

		state.update(GraphEvent::PointerDown { x: start.x, y: start.y });
		state.update(GraphEvent::PointerMove { x: 100.0, y: 100.0 });
		assert!(state.update(GraphEvent::PointerUp).is_none());
		assert_eq!(state.positions[&id], Position::new(100.0, 100.0));
		assert!(!state.drag.is_dragging());

		state.update(GraphEvent::SetLayout(LayoutMode::Force));
		assert_ne!(state.positions[&id], Position::new(100.0, 100.0));
		state.update(GraphEvent::SetLayout(LayoutMode::Circular));
		let fresh = circular_layout(&state.snapshot.nodes, state.width, state.height);
		assert_eq!(state.positions, fresh);
	}

	#[test]
	fn click_selects_and_returns_node() {
		let mut state = loaded(LayoutMode::Circular);
		let target = state.snapshot.nodes[2].clone();
		let p = state.positions[&target.id];

		state.update(GraphEvent::PointerDown { x: p.x + 1.0, y: p.y });
		let clicked = state.update(GraphEvent::PointerUp);
		assert_eq!(clicked.as_ref(), Some(&target));
		assert_eq!(state.selected_node(), Some(&target));
		assert_eq!(state.positions[&target.id], p);

		state.update(GraphEvent::CloseDetails);
		assert!(state.selected_node().is_none());
	}

	#[test]
	fn new_snapshot_clears_selection() {
		let mut state = loaded(LayoutMode::Circular);
		let p = state.positions[&state.snapshot.nodes[0].id];
		state.update(GraphEvent::PointerDown { x: p.x, y: p.y });
		state.update(GraphEvent::PointerUp);
		assert!(state.selected.is_some());
		state.update(GraphEvent::SnapshotLoaded(snapshot(4)));
		assert!(state.selected.is_none());
		assert_eq!(state.positions.len(), 4);
	}

	#[test]
	fn centrality_changes_size_not_position() {
		let mut state = loaded(LayoutMode::Force);
		let before = state.positions.clone();
		let first = state.snapshot.nodes[0].clone();
		state.update(GraphEvent::CentralityLoaded(PageRankResponse {
			pagerank: vec![PageRankEntry {
				url: first.url.clone(),
				score: 0.1,
			}],
		}));
		assert_eq!(state.positions, before);
		assert_eq!(state.overlay.display_size(&first), 20.0);
	}

	#[test]
	fn resize_does_not_relayout() {
		let mut state = loaded(LayoutMode::Circular);
		let before = state.positions.clone();
		state.update(GraphEvent::Resize {
			width: 300.0,
			height: 300.0,
		});
		assert_eq!(state.positions, before);
		assert_eq!(state.width, 300.0);
	}

	#[test]
	fn empty_snapshot_is_fine() {
		let mut state = GraphViewState::new(GraphViewConfig::default(), 1);
		state.update(GraphEvent::SnapshotLoaded(GraphSnapshot::default()));
		assert!(state.positions.is_empty());
		state.update(GraphEvent::PointerDown { x: 10.0, y: 10.0 });
		assert!(state.update(GraphEvent::PointerUp).is_none());
	}
}
