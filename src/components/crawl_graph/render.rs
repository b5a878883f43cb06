use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::layout::Position;
use super::state::GraphViewState;

pub const BACKGROUND: &str = "#fafafa";
const EDGE_COLOR: &str = "#999";
const EDGE_OPACITY: f64 = 0.3;
const NODE_OUTLINE: &str = "#fff";
const SELECTED_OUTLINE: &str = "#333";
const LABEL_COLOR: &str = "#333";
const SCORE_COLOR: &str = "#fff";
const LABEL_GAP: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
	Start,
	Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle<'a> {
	pub size: f64,
	pub color: &'a str,
	pub bold: bool,
	pub anchor: Anchor,
}

/// Something the graph can be drawn onto.
pub trait Surface {
	fn clear(&mut self, width: f64, height: f64);
	fn line(&mut self, from: Position, to: Position, color: &str, width: f64, opacity: f64);
	fn circle(
		&mut self,
		center: Position,
		radius: f64,
		fill: &str,
		opacity: f64,
		outline: (&str, f64),
	);
	fn text(&mut self, at: Position, content: &str, style: TextStyle<'_>);
}

/// Draws edges, then nodes, then labels. Anything without a position is skipped.
pub fn draw<S: Surface + ?Sized>(state: &GraphViewState, surface: &mut S) {
	surface.clear(state.width, state.height);
	draw_edges(state, surface);
	draw_nodes(state, surface);
	draw_labels(state, surface);
}

fn draw_edges<S: Surface + ?Sized>(state: &GraphViewState, surface: &mut S) {
	for edge in &state.snapshot.edges {
		let (Some(&from), Some(&to)) = (
			state.positions.get(&edge.source),
			state.positions.get(&edge.target),
		) else {
			continue;
		};
		surface.line(from, to, EDGE_COLOR, 1.0, EDGE_OPACITY);
	}
}

fn draw_nodes<S: Surface + ?Sized>(state: &GraphViewState, surface: &mut S) {
	let opacity = state.overlay.node_opacity();
	for node in &state.snapshot.nodes {
		let Some(&pos) = state.positions.get(&node.id) else {
			continue;
		};
		let outline = if state.selected.as_deref() == Some(node.id.as_str()) {
			(SELECTED_OUTLINE, 3.0)
		} else {
			(NODE_OUTLINE, 2.0)
		};
		surface.circle(
			pos,
			state.overlay.display_size(node),
			&state.palette.color(&node.domain),
			opacity,
			outline,
		);
	}
}

fn draw_labels<S: Surface + ?Sized>(state: &GraphViewState, surface: &mut S) {
	for node in &state.snapshot.nodes {
		let Some(&pos) = state.positions.get(&node.id) else {
			continue;
		};
		let radius = state.overlay.display_size(node);

		if let Some(score) = state.overlay.score_label(node) {
			let style = TextStyle {
				size: 9.0,
				color: SCORE_COLOR,
				bold: true,
				anchor: Anchor::Middle,
			};
			surface.text(Position::new(pos.x, pos.y - 2.0), &score, style);
		}

		if !node.label.is_empty() {
			let style = TextStyle {
				size: 10.0,
				color: LABEL_COLOR,
				bold: false,
				anchor: Anchor::Start,
			};
			let at = Position::new(pos.x + radius + LABEL_GAP, pos.y + 4.0);
			surface.text(at, &node.label, style);
		}
	}
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.set_global_alpha(1.0);
		self.set_fill_style_str(BACKGROUND);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn line(&mut self, from: Position, to: Position, color: &str, width: f64, opacity: f64) {
		self.set_global_alpha(opacity);
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.x, from.y);
		self.line_to(to.x, to.y);
		self.stroke();
		self.set_global_alpha(1.0);
	}

	fn circle(
		&mut self,
		center: Position,
		radius: f64,
		fill: &str,
		opacity: f64,
		(outline, outline_width): (&str, f64),
	) {
		self.set_global_alpha(opacity);
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(fill);
		self.fill();
		self.set_stroke_style_str(outline);
		self.set_line_width(outline_width);
		self.stroke();
		self.set_global_alpha(1.0);
	}

	fn text(&mut self, at: Position, content: &str, style: TextStyle<'_>) {
		let weight = if style.bold { "bold " } else { "" };
		self.set_font(&format!("{weight}{}px sans-serif", style.size));
		self.set_text_align(match style.anchor {
			Anchor::Start => "start",
			Anchor::Middle => "center",
		});
		self.set_fill_style_str(style.color);
		let _ = self.fill_text(content, at.x, at.y);
	}
}
