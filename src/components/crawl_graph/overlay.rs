//! Centrality overlay: rescales node radii by an external score.
//!
//! The overlay never touches positions.

use std::collections::HashMap;

use super::types::{GraphNode, PageRankResponse};

pub const MIN_SIZE: f64 = 5.0;
pub const MAX_SIZE: f64 = 15.0;
pub const MIN_SCORED_SIZE: f64 = 8.0;
pub const MAX_SCORED_SIZE: f64 = 25.0;
const SCORE_SCALE: f64 = 200.0;

/// Radius from word count alone.
pub fn base_size(size: f64) -> f64 {
	(2.0 * (size.max(0.0) + 1.0).ln()).clamp(MIN_SIZE, MAX_SIZE)
}

pub fn scored_size(score: f64) -> f64 {
	(SCORE_SCALE * score).clamp(MIN_SCORED_SIZE, MAX_SCORED_SIZE)
}

#[derive(Clone, Debug, Default)]
pub struct CentralityOverlay {
	enabled: bool,
	scores: HashMap<String, f64>,
}

impl CentralityOverlay {
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Turns the overlay on with fresh scores. The payload is keyed by page
	/// url; entries are re-keyed to the id of the node carrying that url,
	/// falling back to the url itself when no node does.
	pub fn enable(&mut self, response: PageRankResponse, nodes: &[GraphNode]) {
		let ids: HashMap<&str, &str> = nodes
			.iter()
			.filter(|n| !n.url.is_empty())
			.map(|n| (n.url.as_str(), n.id.as_str()))
			.collect();
		self.scores = response
			.pagerank
			.into_iter()
			.map(|entry| {
				let id = ids
					.get(entry.url.as_str())
					.map_or(entry.url, |id| (*id).to_string());
				(id, entry.score.max(0.0))
			})
			.collect();
		self.enabled = true;
	}

	pub fn score(&self, id: &str) -> Option<f64> {
		if !self.enabled {
			return None;
		}
		self.scores.get(id).copied()
	}

	pub fn display_size(&self, node: &GraphNode) -> f64 {
		match self.score(&node.id) {
			Some(score) => scored_size(score),
			None => base_size(node.size),
		}
	}

	/// Percentage drawn inside a scored node.
	pub fn score_label(&self, node: &GraphNode) -> Option<String> {
		self.score(&node.id).map(|s| format!("{:.1}", s * 100.0))
	}

	/// Circle opacity; slightly lighter once scores are shown.
	pub fn node_opacity(&self) -> f64 {
		if self.enabled { 0.8 } else { 0.9 }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::crawl_graph::types::PageRankEntry;

	fn node(id: &str, size: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			size,
			..Default::default()
		}
	}

	fn ranks(entries: &[(&str, f64)]) -> PageRankResponse {
		PageRankResponse {
			pagerank: entries
				.iter()
				.map(|(u, s)| PageRankEntry {
					url: u.to_string(),
					score: *s,
				})
				.collect(),
		}
	}

	#[test]
	fn default_size_floor_for_empty_page() {
		let overlay = CentralityOverlay::default();
		assert_eq!(overlay.display_size(&node("a", 0.0)), 5.0);
	}

	#[test]
	fn default_size_caps_large_pages() {
		assert_eq!(base_size(1e9), MAX_SIZE);
		let mid = base_size(100.0);
		assert!((mid - 2.0 * 101f64.ln()).abs() < 1e-12);
	}

	#[test]
	fn scored_node_uses_score() {
		let mut overlay = CentralityOverlay::default();
		overlay.enable(ranks(&[("a", 0.1)]), &[]);
		assert_eq!(overlay.display_size(&node("a", 0.0)), 20.0);
		assert_eq!(overlay.score_label(&node("a", 0.0)).as_deref(), Some("10.0"));
	}

	#[test]
	fn unscored_node_falls_back_when_enabled() {
		let mut overlay = CentralityOverlay::default();
		overlay.enable(ranks(&[("a", 0.5)]), &[]);
		assert_eq!(overlay.display_size(&node("a", 0.0)), MAX_SCORED_SIZE);
		assert_eq!(overlay.display_size(&node("b", 0.0)), 5.0);
		assert!(overlay.score_label(&node("b", 0.0)).is_none());
	}

	#[test]
	fn tiny_scores_clamp_to_minimum() {
		assert_eq!(scored_size(0.0), MIN_SCORED_SIZE);
		assert_eq!(scored_size(0.001), MIN_SCORED_SIZE);
	}

	#[test]
	fn re_enable_replaces_scores() {
		let mut overlay = CentralityOverlay::default();
		overlay.enable(ranks(&[("a", 0.1)]), &[]);
		overlay.enable(ranks(&[("b", 0.1)]), &[]);
		assert!(overlay.is_enabled());
		assert!(overlay.score("a").is_none());
		assert_eq!(overlay.score("b"), Some(0.1));
	}

	#[test]
	fn scores_follow_node_url_to_id() {
		let page = GraphNode {
			id: "n1".into(),
			url: "https://a.org/".into(),
			..Default::default()
		};
		let mut overlay = CentralityOverlay::default();
		overlay.enable(
			ranks(&[("https://a.org/", 0.1), ("https://gone.org/", 0.2)]),
			std::slice::from_ref(&page),
		);
		assert_eq!(overlay.score("n1"), Some(0.1));
		assert!(overlay.score("https://a.org/").is_none());
		assert_eq!(overlay.display_size(&page), 20.0);
		assert_eq!(overlay.score("https://gone.org/"), Some(0.2));
	}

	#[test]
	fn disabled_overlay_hides_label() {
		let overlay = CentralityOverlay::default();
		assert!(overlay.score_label(&node("a", 3.0)).is_none());
		assert_eq!(overlay.node_opacity(), 0.9);
	}
}
