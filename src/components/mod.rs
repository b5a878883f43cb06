//! Reusable view components.

pub mod crawl_graph;
