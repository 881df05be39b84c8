use crate::api::Quest;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A quest snapshot placed on the chain canvas.
///
/// The quest is a deep copy taken when the node entered the chain; later edits
/// to the broader collection do not reach it.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestNode {
	pub quest: Quest,
	/// Editor-local screen position, never sent to the API.
	pub position: Position,
}

impl QuestNode {
	pub fn id(&self) -> &str {
		&self.quest.id
	}

	pub fn title(&self) -> &str {
		&self.quest.title
	}

	pub fn objective_count(&self) -> usize {
		self.quest.objectives.len()
	}
}

/// `from` is a prerequisite of `to`. Endpoints are quest ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
	pub from: String,
	pub to: String,
}

impl Edge {
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
		}
	}

	pub fn touches(&self, id: &str) -> bool {
		self.from == id || self.to == id
	}
}
