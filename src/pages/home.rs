use leptos::prelude::*;
use log::info;

use crate::components::crawl_graph::{CrawlGraphView, GraphNode};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (graph_open, set_graph_open) = signal(false);
	let on_close = Callback::new(move |_: ()| set_graph_open.set(false));
	let on_node_click = Callback::new(|node: GraphNode| info!("Selected {}", node.url));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="home">
				<h1>"Crawl Graph"</h1>
				<p class="subtitle">
					"Explore how crawled pages link to each other. Drag nodes to reposition, click one for details."
				</p>
				<button class="open-graph" on:click=move |_| set_graph_open.set(true)>
					"Show Crawl Graph"
				</button>
			</div>

			<Show when=move || graph_open.get()>
				<CrawlGraphView on_close=on_close on_node_click=on_node_click />
			</Show>
		</ErrorBoundary>
	}
}
