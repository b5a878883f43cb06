use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
	Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement,
	MouseEvent, Url, Window,
};

use super::api::CrawlApi;
use super::color::domain_color;
use super::config::GraphViewConfig;
use super::error::{GraphError, Result};
use super::export::{EXPORT_FILE_NAME, export_svg};
use super::layout::LayoutMode;
use super::render;
use super::state::{GraphEvent, GraphViewState};
use super::types::{GraphNode, GraphStats, truncate_url};

type Listener = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Reactive mirror of the parts of the state the panels show.
#[derive(Clone, Copy)]
struct Panels {
	loading: RwSignal<bool>,
	stats: RwSignal<Option<GraphStats>>,
	selected: RwSignal<Option<GraphNode>>,
	mode: RwSignal<LayoutMode>,
	overlay: RwSignal<bool>,
}

impl Panels {
	fn new() -> Self {
		Self {
			loading: RwSignal::new(true),
			stats: RwSignal::new(None),
			selected: RwSignal::new(None),
			mode: RwSignal::new(LayoutMode::default()),
			overlay: RwSignal::new(false),
		}
	}

	fn sync(&self, state: &GraphViewState) {
		set_if_changed(self.loading, state.loading);
		set_if_changed(self.stats, state.stats.clone());
		set_if_changed(self.selected, state.selected_node().cloned());
		set_if_changed(self.mode, state.mode);
		set_if_changed(self.overlay, state.overlay.is_enabled());
	}
}

fn set_if_changed<T: PartialEq + Send + Sync + 'static>(signal: RwSignal<T>, value: T) {
	if signal.with_untracked(|current| *current != value) {
		signal.set(value);
	}
}

/// The state plus everything needed to publish its changes.
#[derive(Clone)]
struct Session {
	state: Rc<RefCell<GraphViewState>>,
	panels: Panels,
	alive: Arc<AtomicBool>,
}

impl Session {
	fn dispatch(&self, event: GraphEvent) -> Option<GraphNode> {
		let clicked = self.state.borrow_mut().update(event);
		if self.alive.load(Ordering::Relaxed) {
			self.panels.sync(&self.state.borrow());
		}
		clicked
	}
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn measure(canvas: &HtmlCanvasElement, config: &GraphViewConfig) -> (f64, f64) {
	let parent = canvas.parent_element();
	let (w, h) = parent
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((0.0, 0.0));
	(
		if w > 0.0 { w } else { config.width },
		if h > 0.0 { h } else { config.height },
	)
}

fn download_svg(svg: &str) -> Result<()> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let document = window.document().ok_or(GraphError::NoWindow)?;
	let parts = js_sys::Array::of1(&JsValue::from_str(svg));
	let options = BlobPropertyBag::new();
	options.set_type("image/svg+xml");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")?
		.dyn_into()
		.map_err(|_| GraphError::Js("created element is not an anchor".into()))?;
	anchor.set_href(&url);
	anchor.set_download(EXPORT_FILE_NAME);
	anchor.click();
	Url::revoke_object_url(&url)?;
	Ok(())
}

/// Modal crawl graph: canvas, layout controls, statistics and node details.
#[component]
pub fn CrawlGraphView(
	/// Called when the user dismisses the view.
	#[prop(into)]
	on_close: Callback<()>,
	/// Receives the full record of a clicked node.
	#[prop(optional)]
	on_node_click: Option<Callback<GraphNode>>,
	#[prop(optional)] config: Option<GraphViewConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let api = CrawlApi::new(config.api_base_url.clone());
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = Session {
		state: Rc::new(RefCell::new(GraphViewState::new(config.clone(), random_seed()))),
		panels: Panels::new(),
		alive: Arc::new(AtomicBool::new(true)),
	};
	let panels = session.panels;

	let alive = session.alive.clone();
	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	let animate: Listener = Rc::new(RefCell::new(None));
	let resize_cb: Listener = Rc::new(RefCell::new(None));
	let mouseup_cb: Listener = Rc::new(RefCell::new(None));
	let (session_init, api_init) = (session.clone(), api.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("No window, crawl graph disabled");
			return;
		};

		let (w, h) = measure(&canvas, &config);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("2d canvas context unavailable");
				return;
			}
		};
		session_init.dispatch(GraphEvent::Resize {
			width: w,
			height: h,
		});

		let (session_graph, api_graph) = (session_init.clone(), api_init.clone());
		spawn_local(async move {
			let event = match api_graph.graph().await {
				Ok(snapshot) => {
					info!(
						"Crawl graph loaded: {} nodes, {} edges",
						snapshot.nodes.len(),
						snapshot.edges.len()
					);
					GraphEvent::SnapshotLoaded(snapshot)
				}
				Err(err) => {
					error!("Failed to fetch graph data: {err}");
					GraphEvent::SnapshotFailed
				}
			};
			session_graph.dispatch(event);
		});

		let (session_stats, api_stats) = (session_init.clone(), api_init.clone());
		spawn_local(async move {
			match api_stats.stats().await {
				Ok(stats) => {
					session_stats.dispatch(GraphEvent::StatsLoaded(stats));
				}
				Err(err) => error!("Failed to fetch graph stats: {err}"),
			}
		});

		let (session_resize, canvas_resize, config_resize) =
			(session_init.clone(), canvas.clone(), config.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = measure(&canvas_resize, &config_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			session_resize.dispatch(GraphEvent::Resize {
				width: nw,
				height: nh,
			});
		}));

		// Released outside the canvas still ends the drag.
		let session_up = session_init.clone();
		*mouseup_cb.borrow_mut() = Some(Closure::new(move || {
			if let Some(node) = session_up.dispatch(GraphEvent::PointerUp) {
				if let Some(cb) = on_node_click {
					cb.run(node);
				}
			}
		}));

		for (event, cb) in [("resize", &resize_cb), ("mouseup", &mouseup_cb)] {
			if let Some(ref cb) = *cb.borrow() {
				let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
			}
		}

		let (session_anim, animate_inner) = (session_init.clone(), animate.clone());
		let (resize_detach, mouseup_detach) = (resize_cb.clone(), mouseup_cb.clone());
		let mut ctx = ctx;
		*animate.borrow_mut() = Some(Closure::new(move || {
			let Some(win): Option<Window> = web_sys::window() else {
				return;
			};
			if !session_anim.alive.load(Ordering::Relaxed) {
				for (event, cb) in [("resize", &resize_detach), ("mouseup", &mouseup_detach)] {
					if let Some(ref cb) = *cb.borrow() {
						let _ = win
							.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
					}
				}
				return;
			}
			render::draw(&session_anim.state.borrow(), &mut ctx);
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let session_md = session.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			session_md.dispatch(GraphEvent::PointerDown { x, y });
		}
	};

	let session_mm = session.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			session_mm.dispatch(GraphEvent::PointerMove { x, y });
		}
	};

	let session_force = session.clone();
	let on_force = move |_: MouseEvent| {
		session_force.dispatch(GraphEvent::SetLayout(LayoutMode::Force));
	};

	let session_circular = session.clone();
	let on_circular = move |_: MouseEvent| {
		session_circular.dispatch(GraphEvent::SetLayout(LayoutMode::Circular));
	};

	let (session_pr, api_pr) = (session.clone(), api);
	let on_pagerank = move |_: MouseEvent| {
		let (session, api) = (session_pr.clone(), api_pr.clone());
		spawn_local(async move {
			match api.pagerank().await {
				Ok(ranks) => {
					info!("PageRank loaded for {} pages", ranks.pagerank.len());
					session.dispatch(GraphEvent::CentralityLoaded(ranks));
				}
				Err(err) => error!("Failed to fetch PageRank: {err}"),
			}
		});
	};

	let session_export = session.clone();
	let on_export = move |_: MouseEvent| {
		let svg = export_svg(&session_export.state.borrow());
		if let Err(err) = download_svg(&svg) {
			error!("SVG export failed: {err}");
		}
	};

	let session_close = session;
	let close_details = move |_: MouseEvent| {
		session_close.dispatch(GraphEvent::CloseDetails);
	};

	view! {
		<div class="graph-modal-overlay" on:click=move |_| on_close.run(())>
			<div class="graph-modal-content" on:click=|ev: MouseEvent| ev.stop_propagation()>
				<div class="graph-modal-header">
					<h2>"Web Crawl Graph"</h2>
					<button class="close-button" on:click=move |_| on_close.run(())>
						"\u{00d7}"
					</button>
				</div>

				<div class="graph-modal-body">
					<div class="graph-sidebar">
						{move || panels.stats.get().map(|stats| view! { <StatsPanel stats=stats /> })}
						{move || {
							panels.selected.get().map(|node| view! { <NodeDetails node=node /> })
						}}
						<button
							class="close-details"
							style:display=move || {
								if panels.selected.with(Option::is_some) { "block" } else { "none" }
							}
							on:click=close_details
						>
							"Close details"
						</button>
					</div>

					<div class="graph-canvas-container">
						<div class="graph-controls">
							<button
								class:active=move || panels.mode.get() == LayoutMode::Force
								on:click=on_force
							>
								"Force"
							</button>
							<button
								class:active=move || panels.mode.get() == LayoutMode::Circular
								on:click=on_circular
							>
								"Circular"
							</button>
							<button on:click=on_pagerank disabled=move || panels.overlay.get()>
								"PageRank"
							</button>
							<button on:click=on_export>"Export SVG"</button>
						</div>

						<div class="graph-canvas">
							<canvas
								node_ref=canvas_ref
								class="crawl-graph-canvas"
								on:mousedown=on_mousedown
								on:mousemove=on_mousemove
								style="display: block; cursor: pointer;"
							/>
							<Show when=move || panels.loading.get()>
								<div class="loader-container">
									<div class="loader"></div>
									<p>"Loading graph..."</p>
								</div>
							</Show>
						</div>
					</div>
				</div>
			</div>
		</div>
	}
}

#[component]
fn StatsPanel(stats: GraphStats) -> impl IntoView {
	let hubs: Vec<(String, String, u64)> = stats
		.hubs()
		.iter()
		.map(|hub| (hub.url.clone(), truncate_url(&hub.url, 30), hub.out_degree))
		.collect();
	let domains: Vec<(String, u64)> = stats
		.top_domains()
		.into_iter()
		.map(|(domain, count)| (domain.to_string(), count))
		.collect();

	view! {
		<div class="stats-panel">
			<h3>"Statistics"</h3>
			<div class="stat-item">
				<span class="stat-label">"Total Nodes:"</span>
				<span class="stat-value">{stats.total_nodes}</span>
			</div>
			<div class="stat-item">
				<span class="stat-label">"Total Links:"</span>
				<span class="stat-value">{stats.total_edges}</span>
			</div>
			<div class="stat-item">
				<span class="stat-label">"Avg Degree:"</span>
				<span class="stat-value">{format!("{:.2}", stats.avg_degree)}</span>
			</div>
			<div class="stat-item">
				<span class="stat-label">"Density:"</span>
				<span class="stat-value">{format!("{:.4}", stats.density)}</span>
			</div>

			<h4>"Top Hubs"</h4>
			<ul class="hub-list">
				{hubs
					.into_iter()
					.map(|(url, short, degree)| {
						view! {
							<li title=url>
								<span class="hub-url">{short}</span>
								<span class="hub-degree">{degree}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>

			<h4>"Domains"</h4>
			<ul class="domain-list">
				{domains
					.into_iter()
					.map(|(domain, count)| {
						let swatch = domain_color(&domain);
						view! {
							<li>
								<span class="domain-color" style:background-color=swatch></span>
								<span class="domain-name">{domain}</span>
								<span class="domain-count">{count}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>
		</div>
	}
}

#[component]
fn NodeDetails(node: GraphNode) -> impl IntoView {
	let url = node.url.clone();
	let visit = move |_: MouseEvent| {
		let opened = web_sys::window().map(|w| w.open_with_url_and_target(&url, "_blank"));
		if !matches!(opened, Some(Ok(_))) {
			error!("Could not open {url}");
		}
	};

	view! {
		<div class="node-details">
			<h3>"Node Details"</h3>
			<div class="detail-item">
				<strong>"Title:"</strong>
				<p>{node.title}</p>
			</div>
			<div class="detail-item">
				<strong>"URL:"</strong>
				<p class="url-text">{node.url}</p>
			</div>
			<div class="detail-item">
				<strong>"Domain:"</strong>
				<p>{node.domain}</p>
			</div>
			<div class="detail-item">
				<strong>"Size:"</strong>
				<p>{format!("{} words", node.size)}</p>
			</div>
			<button class="visit-button" on:click=visit>
				"Visit Page"
			</button>
		</div>
	}
}
