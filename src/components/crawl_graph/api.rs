//! Client for the crawl API's graph endpoints.

use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::{GraphError, Result, js_message};
use super::types::{GraphSnapshot, GraphStats, PageRankResponse};

#[derive(Clone, Debug)]
pub struct CrawlApi {
	base_url: String,
}

impl CrawlApi {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
		}
	}

	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
	}

	pub async fn graph(&self) -> Result<GraphSnapshot> {
		fetch_json(&self.endpoint("graph")).await
	}

	pub async fn stats(&self) -> Result<GraphStats> {
		fetch_json(&self.endpoint("graph/stats")).await
	}

	pub async fn pagerank(&self) -> Result<PageRankResponse> {
		fetch_json(&self.endpoint("graph/pagerank")).await
	}
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|err| GraphError::Network(js_message(&err)))?
		.dyn_into()?;
	if !response.ok() {
		return Err(GraphError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}
	let body = JsFuture::from(response.text()?).await?;
	let text = body
		.as_string()
		.ok_or_else(|| GraphError::Network(format!("{url} returned a non-text body")))?;
	Ok(serde_json::from_str(&text)?)
}
