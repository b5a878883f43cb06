//! Pointer handling: picking, dragging and click detection.

use log::debug;

use super::layout::{Position, PositionMap};
use super::overlay::CentralityOverlay;
use super::types::GraphNode;

/// Pointer travel below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
	Ignored,
	DragStarted(String),
	Moved,
	Clicked(String),
	Released(String),
}

/// `idle` when `node_id` is `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragState {
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	/// Set once the pointer leaves the click slop; the node follows from then on.
	pub moved: bool,
}

impl DragState {
	pub fn is_dragging(&self) -> bool {
		self.node_id.is_some()
	}

	pub fn pointer_down(&mut self, hit: Option<&GraphNode>, x: f64, y: f64) -> PointerOutcome {
		if self.is_dragging() {
			debug!("pointer-down ignored, a drag is in progress");
			return PointerOutcome::Ignored;
		}
		let Some(node) = hit else {
			return PointerOutcome::Ignored;
		};
		*self = DragState {
			node_id: Some(node.id.clone()),
			start_x: x,
			start_y: y,
			moved: false,
		};
		PointerOutcome::DragStarted(node.id.clone())
	}

	/// Moves the dragged node to the pointer. Never adds a key to `positions`.
	pub fn pointer_move(
		&mut self,
		positions: &mut PositionMap,
		x: f64,
		y: f64,
		slop: f64,
	) -> PointerOutcome {
		let Some(id) = self.node_id.clone() else {
			return PointerOutcome::Ignored;
		};
		if !self.moved {
			let travel = Position::new(self.start_x, self.start_y).distance(Position::new(x, y));
			if travel < slop {
				return PointerOutcome::Ignored;
			}
			self.moved = true;
		}
		match positions.get_mut(&id) {
			Some(pos) => {
				*pos = Position::new(x, y);
				PointerOutcome::Moved
			}
			None => {
				debug!("drag target {id} has no position, ignoring");
				PointerOutcome::Ignored
			}
		}
	}

	/// Always returns to idle.
	pub fn pointer_up(&mut self) -> PointerOutcome {
		let state = std::mem::take(self);
		match state.node_id {
			Some(id) if state.moved => PointerOutcome::Released(id),
			Some(id) => PointerOutcome::Clicked(id),
			None => PointerOutcome::Ignored,
		}
	}

	pub fn cancel(&mut self) {
		*self = DragState::default();
	}
}

/// Topmost node under `(x, y)`; nodes later in the sequence are drawn on top.
pub fn node_at_position<'a>(
	nodes: &'a [GraphNode],
	positions: &PositionMap,
	overlay: &CentralityOverlay,
	x: f64,
	y: f64,
) -> Option<&'a GraphNode> {
	let pointer = Position::new(x, y);
	nodes.iter().rev().find(|node| {
		positions
			.get(&node.id)
			.is_some_and(|p| p.distance(pointer) <= overlay.display_size(node))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			..Default::default()
		}
	}

	fn positions() -> PositionMap {
		PositionMap::from([
			("a".to_string(), Position::new(50.0, 50.0)),
			("b".to_string(), Position::new(200.0, 200.0)),
		])
	}

	#[test]
	fn drag_moves_node_and_returns_to_idle() {
		let mut pos = positions();
		let mut drag = DragState::default();
		let a = node("a");
		assert_eq!(
			drag.pointer_down(Some(&a), 50.0, 50.0),
			PointerOutcome::DragStarted("a".into())
		);
		assert_eq!(
			drag.pointer_move(&mut pos, 100.0, 100.0, CLICK_SLOP_PX),
			PointerOutcome::Moved
		);
		assert_eq!(drag.pointer_up(), PointerOutcome::Released("a".into()));
		assert_eq!(pos["a"], Position::new(100.0, 100.0));
		assert!(!drag.is_dragging());
		assert_eq!(pos.len(), 2);
	}

	#[test]
	fn press_release_in_place_is_click() {
		let mut pos = positions();
		let mut drag = DragState::default();
		drag.pointer_down(Some(&node("b")), 200.0, 200.0);
		assert_eq!(
			drag.pointer_move(&mut pos, 201.0, 201.0, CLICK_SLOP_PX),
			PointerOutcome::Ignored
		);
		assert_eq!(drag.pointer_up(), PointerOutcome::Clicked("b".into()));
		assert_eq!(pos["b"], Position::new(200.0, 200.0));
		assert!(!drag.is_dragging());
	}

	#[test]
	fn first_drag_wins() {
		let mut pos = positions();
		let mut drag = DragState::default();
		drag.pointer_down(Some(&node("a")), 50.0, 50.0);
		assert_eq!(
			drag.pointer_down(Some(&node("b")), 200.0, 200.0),
			PointerOutcome::Ignored
		);
		drag.pointer_move(&mut pos, 120.0, 80.0, CLICK_SLOP_PX);
		assert_eq!(pos["a"], Position::new(120.0, 80.0));
		assert_eq!(pos["b"], Position::new(200.0, 200.0));
	}

	#[test]
	fn missing_position_is_silent_noop() {
		let mut pos = positions();
		let mut drag = DragState::default();
		drag.pointer_down(Some(&node("ghost")), 0.0, 0.0);
		assert_eq!(
			drag.pointer_move(&mut pos, 90.0, 90.0, CLICK_SLOP_PX),
			PointerOutcome::Ignored
		);
		assert!(!pos.contains_key("ghost"));
		assert_eq!(drag.pointer_up(), PointerOutcome::Released("ghost".into()));
	}

	#[test]
	fn pointer_up_while_idle_is_ignored() {
		let mut drag = DragState::default();
		assert_eq!(drag.pointer_up(), PointerOutcome::Ignored);
		assert_eq!(
			drag.pointer_down(None, 10.0, 10.0),
			PointerOutcome::Ignored
		);
		assert!(!drag.is_dragging());
	}

	#[test]
	fn hit_test_prefers_topmost_and_respects_radius() {
		let nodes = vec![node("a"), node("b"), node("c")];
		let mut pos = positions();
		pos.insert("c".into(), Position::new(52.0, 50.0));
		let overlay = CentralityOverlay::default();
		let hit = node_at_position(&nodes, &pos, &overlay, 51.0, 50.0).map(|n| n.id.as_str());
		assert_eq!(hit, Some("c"));
		// Default radius for an empty page is 5.
		assert!(node_at_position(&nodes, &pos, &overlay, 200.0, 206.0).is_none());
		assert_eq!(
			node_at_position(&nodes, &pos, &overlay, 200.0, 204.0).map(|n| n.id.as_str()),
			Some("b")
		);
	}
}
