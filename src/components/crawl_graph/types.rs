//! Graph model and the payloads served by the crawl API.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A crawled page. Immutable for the lifetime of the snapshot it came in.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub domain: String,
	/// Word count of the page, the default sizing basis.
	#[serde(default)]
	pub size: f64,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub title: String,
}

/// A hyperlink. Endpoints are looked up by id and may dangle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

/// One fetched `{nodes, edges}` payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSnapshot {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HubInfo {
	pub url: String,
	pub out_degree: u64,
}

/// Side panel figures. The backend may omit any of these.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphStats {
	pub total_nodes: u64,
	pub total_edges: u64,
	pub avg_degree: f64,
	pub density: f64,
	pub top_hubs: Vec<HubInfo>,
	pub domains: BTreeMap<String, u64>,
}

impl GraphStats {
	pub const HUB_LIMIT: usize = 5;
	pub const DOMAIN_LIMIT: usize = 10;

	pub fn hubs(&self) -> &[HubInfo] {
		&self.top_hubs[..self.top_hubs.len().min(Self::HUB_LIMIT)]
	}

	/// Largest domains first, ties broken by name.
	pub fn top_domains(&self) -> Vec<(&str, u64)> {
		let mut out: Vec<(&str, u64)> =
			self.domains.iter().map(|(d, &c)| (d.as_str(), c)).collect();
		out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		out.truncate(Self::DOMAIN_LIMIT);
		out
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PageRankEntry {
	pub url: String,
	pub score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageRankResponse {
	#[serde(default)]
	pub pagerank: Vec<PageRankEntry>,
}

/// Shortens a hub url for the side panel.
pub fn truncate_url(url: &str, max_chars: usize) -> String {
	if url.chars().count() <= max_chars {
		return url.to_string();
	}
	let head: String = url.chars().take(max_chars).collect();
	format!("{head}...")
}
