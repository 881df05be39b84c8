use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A quest as the content API serves it.
///
/// Only the fields the chain editor reads or writes are typed. Everything else
/// (description, giver NPC, rewards, dialogue, objective shapes) is carried in
/// `extra` so that a PUT sends back exactly what was fetched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub objectives: Vec<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub requirements: Option<QuestRequirements>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Quest {
	#[cfg(test)]
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			..Self::default()
		}
	}

	/// Prerequisite ids, empty when the quest has no requirements block.
	pub fn prerequisites(&self) -> &[String] {
		self.requirements
			.as_ref()
			.map(|r| r.required_quests_completed.as_slice())
			.unwrap_or(&[])
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRequirements {
	#[serde(default = "default_min_level")]
	pub min_level: u32,
	#[serde(default)]
	pub required_quests_completed: Vec<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

fn default_min_level() -> u32 {
	1
}

impl Default for QuestRequirements {
	fn default() -> Self {
		Self {
			min_level: default_min_level(),
			required_quests_completed: Vec::new(),
			extra: Map::new(),
		}
	}
}

/// Body of `GET /api/quests`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuestList {
	#[serde(default)]
	pub quests: Vec<Quest>,
}
