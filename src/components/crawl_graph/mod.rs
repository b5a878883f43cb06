//! Crawl graph view: layout solver, centrality overlay, pointer handling
//! and a surface-agnostic renderer, bound to a canvas component.

mod api;
pub mod color;
mod component;
pub mod config;
mod error;
pub mod export;
pub mod interaction;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod state;
pub mod types;

pub use component::CrawlGraphView;
pub use types::GraphNode;
