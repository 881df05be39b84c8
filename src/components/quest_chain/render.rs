use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::graph::ChainGraph;
use super::layout::{
	Gesture, HANDLE_RADIUS, Hit, InteractionState, NODE_HEIGHT, NODE_WIDTH, REMOVE_SIZE,
	input_handle, output_handle, remove_control,
};
use super::types::Position;

const BACKGROUND: &str = "#1a1a2e";
const NODE_FILL: &str = "#24243e";
const NODE_BORDER: &str = "#3b3b5c";
const ACCENT: &str = "rgba(100, 180, 255, 0.9)";
const ARROW_SIZE: f64 = 8.0;

/// Cubic curve from a prerequisite's output handle to a dependent's input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePath {
	pub from: Position,
	pub to: Position,
}

impl EdgePath {
	/// Bezier control points, pulled horizontally out of each handle.
	pub fn controls(&self) -> (Position, Position) {
		let pull = ((self.to.x - self.from.x).abs() / 2.0).max(40.0);
		(
			Position::new(self.from.x + pull, self.from.y),
			Position::new(self.to.x - pull, self.to.y),
		)
	}
}

/// Every edge in the chain as a screen-independent path.
pub fn edge_paths(graph: &ChainGraph) -> Vec<EdgePath> {
	graph
		.index_edges()
		.into_iter()
		.filter_map(|(from, to)| {
			Some(EdgePath {
				from: output_handle(graph.node(from)?.position),
				to: input_handle(graph.node(to)?.position),
			})
		})
		.collect()
}

/// The edge being dragged out of an output handle, if any.
pub fn provisional_path(graph: &ChainGraph, state: &InteractionState) -> Option<EdgePath> {
	match state.gesture {
		Gesture::Connect { source, pointer } => Some(EdgePath {
			from: output_handle(graph.node(source)?.position),
			to: pointer,
		}),
		_ => None,
	}
}

pub fn render(
	graph: &ChainGraph,
	state: &InteractionState,
	width: f64,
	height: f64,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	draw_edges(graph, state, ctx);
	draw_nodes(graph, state, ctx);
	ctx.restore();
}

fn stroke_path(path: &EdgePath, ctx: &CanvasRenderingContext2d) {
	let (c1, c2) = path.controls();
	ctx.begin_path();
	ctx.move_to(path.from.x, path.from.y);
	ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, path.to.x - ARROW_SIZE, path.to.y);
	ctx.stroke();
}

fn draw_arrow(tip: Position, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(tip.x - ARROW_SIZE, tip.y - ARROW_SIZE * 0.5);
	ctx.line_to(tip.x - ARROW_SIZE, tip.y + ARROW_SIZE * 0.5);
	ctx.close_path();
	ctx.fill();
}

fn draw_edges(graph: &ChainGraph, state: &InteractionState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(ACCENT);
	ctx.set_fill_style_str(ACCENT);
	ctx.set_line_width(2.0);
	for path in edge_paths(graph) {
		stroke_path(&path, ctx);
		draw_arrow(path.to, ctx);
	}

	if let Some(path) = provisional_path(graph, state) {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0),
			&JsValue::from_f64(4.0),
		));
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
		stroke_path(&path, ctx);
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn draw_handle(centre: Position, highlighted: bool, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	let _ = ctx.arc(centre.x, centre.y, HANDLE_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(if highlighted { "white" } else { ACCENT });
	ctx.fill();
}

fn draw_nodes(graph: &ChainGraph, state: &InteractionState, ctx: &CanvasRenderingContext2d) {
	let connecting = matches!(state.gesture, Gesture::Connect { .. });

	for (i, node) in graph.nodes().iter().enumerate() {
		let pos = node.position;
		let hovered = state.hover.is_some_and(|h| h.index() == i);

		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill_rect(pos.x, pos.y, NODE_WIDTH, NODE_HEIGHT);
		ctx.set_stroke_style_str(if hovered { ACCENT } else { NODE_BORDER });
		ctx.set_line_width(if hovered { 2.0 } else { 1.0 });
		ctx.stroke_rect(pos.x, pos.y, NODE_WIDTH, NODE_HEIGHT);

		ctx.set_fill_style_str("white");
		ctx.set_font("bold 14px sans-serif");
		let _ =
			ctx.fill_text_with_max_width(node.title(), pos.x + 12.0, pos.y + 28.0, NODE_WIDTH - 48.0);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_font("11px sans-serif");
		let _ =
			ctx.fill_text_with_max_width(node.id(), pos.x + 12.0, pos.y + 48.0, NODE_WIDTH - 24.0);
		let _ = ctx.fill_text(
			&format!("{} objectives", node.objective_count()),
			pos.x + 12.0,
			pos.y + 72.0,
		);

		let remove = remove_control(pos);
		let remove_hot = state.hover == Some(Hit::Remove(i));
		ctx.set_fill_style_str(if remove_hot { "#ef4444" } else { "rgba(239, 68, 68, 0.6)" });
		ctx.set_font("bold 16px sans-serif");
		let _ = ctx.fill_text("\u{00d7}", remove.x + 4.0, remove.y + REMOVE_SIZE - 3.0);

		draw_handle(
			input_handle(pos),
			connecting && state.hover == Some(Hit::Input(i)),
			ctx,
		);
		draw_handle(output_handle(pos), state.hover == Some(Hit::Output(i)), ctx);
	}
}
