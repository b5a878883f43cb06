use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GraphError {
	#[error("network error: {0}")]
	Network(String),

	#[error("{url} answered with status {status}")]
	Status { url: String, status: u16 },

	#[error("malformed payload: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("browser call failed: {0}")]
	Js(String),

	#[error("no browser window available")]
	NoWindow,
}

pub type Result<T> = std::result::Result<T, GraphError>;

// Browser APIs reject with arbitrary JS values.
impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		GraphError::Js(js_message(&value))
	}
}

pub(crate) fn js_message(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
