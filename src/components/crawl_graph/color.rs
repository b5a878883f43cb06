//! Domain colouring.

use std::collections::HashMap;

use super::types::GraphNode;

/// Browser-style string hash: only `h << 5` is truncated to 32 bits, the
/// running value itself is not. Reduced into `[0, 360)`.
pub fn domain_hue(domain: &str) -> u16 {
	let hash = domain.encode_utf16().fold(0i64, |h, c| {
		i64::from(c) + (i64::from((h as i32).wrapping_shl(5)) - h)
	});
	hash.rem_euclid(360) as u16
}

pub fn domain_color(domain: &str) -> String {
	format!("hsl({}, 65%, 55%)", domain_hue(domain))
}

/// Colours for one snapshot, computed once per distinct domain.
#[derive(Clone, Debug, Default)]
pub struct DomainPalette {
	colors: HashMap<String, String>,
}

impl DomainPalette {
	pub fn from_nodes(nodes: &[GraphNode]) -> Self {
		let mut colors = HashMap::new();
		for node in nodes {
			if !colors.contains_key(&node.domain) {
				colors.insert(node.domain.clone(), domain_color(&node.domain));
			}
		}
		Self { colors }
	}

	pub fn color(&self, domain: &str) -> String {
		self.colors
			.get(domain)
			.cloned()
			.unwrap_or_else(|| domain_color(domain))
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}
}
