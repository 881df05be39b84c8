//! Node placement, hit testing and the pointer gesture state machine.

use log::debug;

use super::graph::ChainGraph;
use super::types::Position;

pub const GRID_COLUMNS: usize = 3;
pub const GRID_ORIGIN: f64 = 50.0;
pub const COLUMN_SPACING: f64 = 300.0;
pub const ROW_SPACING: f64 = 200.0;

pub const NODE_WIDTH: f64 = 220.0;
pub const NODE_HEIGHT: f64 = 96.0;
pub const HANDLE_RADIUS: f64 = 7.0;
pub const HANDLE_HIT_RADIUS: f64 = 12.0;
pub const REMOVE_SIZE: f64 = 18.0;
const REMOVE_INSET: f64 = 6.0;

/// Grid slot for the node at `index`.
pub fn grid_position(index: usize) -> Position {
	let column = (index % GRID_COLUMNS) as f64;
	let row = (index / GRID_COLUMNS) as f64;
	Position::new(
		GRID_ORIGIN + column * COLUMN_SPACING,
		GRID_ORIGIN + row * ROW_SPACING,
	)
}

/// Centre of the input handle on the node's left edge.
pub fn input_handle(node: Position) -> Position {
	Position::new(node.x, node.y + NODE_HEIGHT / 2.0)
}

/// Centre of the output handle on the node's right edge.
pub fn output_handle(node: Position) -> Position {
	Position::new(node.x + NODE_WIDTH, node.y + NODE_HEIGHT / 2.0)
}

/// Top-left corner of the remove control.
pub fn remove_control(node: Position) -> Position {
	Position::new(
		node.x + NODE_WIDTH - REMOVE_SIZE - REMOVE_INSET,
		node.y + REMOVE_INSET,
	)
}

/// Part of a node under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	Body(usize),
	Input(usize),
	Output(usize),
	Remove(usize),
}

impl Hit {
	pub fn index(self) -> usize {
		match self {
			Hit::Body(i) | Hit::Input(i) | Hit::Output(i) | Hit::Remove(i) => i,
		}
	}
}

fn within_radius(p: Position, centre: Position, radius: f64) -> bool {
	let (dx, dy) = (p.x - centre.x, p.y - centre.y);
	(dx * dx + dy * dy).sqrt() <= radius
}

fn within_rect(p: Position, origin: Position, w: f64, h: f64) -> bool {
	p.x >= origin.x && p.x <= origin.x + w && p.y >= origin.y && p.y <= origin.y + h
}

/// Topmost node part at graph-space point `p`. Later nodes paint over earlier
/// ones, so they are tested first.
pub fn hit_test(graph: &ChainGraph, p: Position) -> Option<Hit> {
	graph.nodes().iter().enumerate().rev().find_map(|(i, node)| {
		let pos = node.position;
		if within_radius(p, input_handle(pos), HANDLE_HIT_RADIUS) {
			Some(Hit::Input(i))
		} else if within_radius(p, output_handle(pos), HANDLE_HIT_RADIUS) {
			Some(Hit::Output(i))
		} else if within_rect(p, remove_control(pos), REMOVE_SIZE, REMOVE_SIZE) {
			Some(Hit::Remove(i))
		} else if within_rect(p, pos, NODE_WIDTH, NODE_HEIGHT) {
			Some(Hit::Body(i))
		} else {
			None
		}
	})
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
}

/// The one gesture that may be active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	Drag {
		index: usize,
		start: Position,
		node_start: Position,
	},
	Connect {
		source: usize,
		pointer: Position,
	},
	Pan {
		start: Position,
		transform_start: ViewTransform,
	},
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	pub gesture: Gesture,
	pub transform: ViewTransform,
	pub hover: Option<Hit>,
}

impl InteractionState {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new(sx - self.transform.x, sy - self.transform.y)
	}

	/// Starts a gesture, or removes a node when the press lands on its remove
	/// control. Returns `true` when the chain structure changed.
	pub fn pointer_down(&mut self, graph: &mut ChainGraph, sx: f64, sy: f64) -> bool {
		if self.gesture != Gesture::Idle {
			return false;
		}
		let p = self.screen_to_graph(sx, sy);
		match hit_test(graph, p) {
			Some(Hit::Remove(i)) => {
				self.hover = None;
				graph.remove_node(i).is_some()
			}
			Some(Hit::Output(source)) => {
				self.gesture = Gesture::Connect { source, pointer: p };
				false
			}
			Some(Hit::Body(index)) => {
				if let Some(node) = graph.node(index) {
					self.gesture = Gesture::Drag {
						index,
						start: p,
						node_start: node.position,
					};
				}
				false
			}
			Some(Hit::Input(_)) => false,
			None => {
				self.gesture = Gesture::Pan {
					start: Position::new(sx, sy),
					transform_start: self.transform,
				};
				false
			}
		}
	}

	pub fn pointer_move(&mut self, graph: &mut ChainGraph, sx: f64, sy: f64) {
		let p = self.screen_to_graph(sx, sy);
		match &mut self.gesture {
			Gesture::Idle => self.hover = hit_test(graph, p),
			Gesture::Drag {
				index,
				start,
				node_start,
			} => {
				if let Some(node) = graph.node_mut(*index) {
					node.position =
						Position::new(node_start.x + p.x - start.x, node_start.y + p.y - start.y);
				}
			}
			Gesture::Connect { pointer, .. } => {
				*pointer = p;
				self.hover = hit_test(graph, p);
			}
			Gesture::Pan {
				start,
				transform_start,
			} => {
				self.transform = ViewTransform {
					x: transform_start.x + sx - start.x,
					y: transform_start.y + sy - start.y,
				};
			}
		}
	}

	/// Ends the active gesture. A connect gesture released over another
	/// node's input handle adds the edge; returns `true` when it did.
	pub fn pointer_up(&mut self, graph: &mut ChainGraph, sx: f64, sy: f64) -> bool {
		let p = self.screen_to_graph(sx, sy);
		let gesture = std::mem::take(&mut self.gesture);
		match gesture {
			Gesture::Connect { source, .. } => match hit_test(graph, p) {
				Some(Hit::Input(target)) if target != source => graph.add_edge(source, target),
				_ => {
					debug!("Discarded provisional edge from {source}");
					false
				}
			},
			_ => false,
		}
	}

	/// Abandons the active gesture, e.g. when the pointer leaves the canvas.
	pub fn cancel(&mut self) {
		self.gesture = Gesture::Idle;
		self.hover = None;
	}
}
