use serde::Deserialize;

use super::interaction::CLICK_SLOP_PX;
use super::layout::ForceParams;

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Knobs for the crawl graph view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphViewConfig {
	/// Base url of the crawl API, without trailing slash.
	pub api_base_url: String,
	/// Canvas extents used when the parent element has no size.
	pub width: f64,
	pub height: f64,
	pub force: ForceParams,
	pub click_slop: f64,
}

impl Default for GraphViewConfig {
	fn default() -> Self {
		Self {
			api_base_url: option_env!("CRAWL_API_URL")
				.unwrap_or(DEFAULT_API_URL)
				.trim_end_matches('/')
				.to_string(),
			width: 800.0,
			height: 600.0,
			force: ForceParams::default(),
			click_slop: CLICK_SLOP_PX,
		}
	}
}
