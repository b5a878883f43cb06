//! SVG export of the current view.

use std::fmt::Write;

use super::layout::Position;
use super::render::{Anchor, Surface, TextStyle, draw};
use super::state::GraphViewState;

pub const EXPORT_FILE_NAME: &str = "crawl-graph.svg";

#[derive(Default)]
pub struct SvgSurface {
	body: String,
	width: f64,
	height: f64,
}

impl SvgSurface {
	pub fn finish(self) -> String {
		format!(
			r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
			w = self.width,
			h = self.height,
			body = self.body,
		)
	}
}

impl Surface for SvgSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.body.clear();
		let _ = write!(
			self.body,
			r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
			super::render::BACKGROUND
		);
	}

	fn line(&mut self, from: Position, to: Position, color: &str, width: f64, opacity: f64) {
		let _ = write!(
			self.body,
			r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{color}" stroke-width="{width}" opacity="{opacity}"/>"#,
			from.x, from.y, to.x, to.y
		);
	}

	fn circle(
		&mut self,
		center: Position,
		radius: f64,
		fill: &str,
		opacity: f64,
		(outline, outline_width): (&str, f64),
	) {
		let _ = write!(
			self.body,
			r#"<circle cx="{:.2}" cy="{:.2}" r="{radius:.2}" fill="{fill}" stroke="{outline}" stroke-width="{outline_width}" opacity="{opacity}"/>"#,
			center.x, center.y
		);
	}

	fn text(&mut self, at: Position, content: &str, style: TextStyle<'_>) {
		let anchor = match style.anchor {
			Anchor::Start => "start",
			Anchor::Middle => "middle",
		};
		let weight = if style.bold { r#" font-weight="bold""# } else { "" };
		let _ = write!(
			self.body,
			r#"<text x="{:.2}" y="{:.2}" font-size="{}" fill="{}" text-anchor="{anchor}"{weight}>{}</text>"#,
			at.x,
			at.y,
			style.size,
			style.color,
			escape(content)
		);
	}
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&apos;"),
			_ => out.push(c),
		}
	}
	out
}

/// Serialises exactly what the canvas shows.
pub fn export_svg(state: &GraphViewState) -> String {
	let mut svg = SvgSurface::default();
	draw(state, &mut svg);
	svg.finish()
}
