//! Keeps each quest's `requiredQuestsCompleted` in step with the edge set.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::graph::ChainGraph;
use crate::api::Quest;

/// How node removal feeds back into the surviving quests' prerequisites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
	/// Edges only ever add prerequisites; removal leaves them in place.
	AppendOnly,
	/// Removing a node strips its id from the quests it was a prerequisite of.
	#[default]
	PruneRemoved,
	/// Prune on removal, then [`reconcile`] after every structural change.
	Reconcile,
}

/// Appends `from_id` to `to`'s prerequisites, creating the requirements block
/// when absent. Returns whether the list changed.
pub(super) fn link_prerequisite(from_id: &str, to: &mut Quest) -> bool {
	let req = to.requirements.get_or_insert_with(Default::default);
	if req.required_quests_completed.iter().any(|id| id == from_id) {
		return false;
	}
	req.required_quests_completed.push(from_id.to_owned());
	true
}

/// Drops every occurrence of `id` from `quest`'s prerequisites.
pub(super) fn unlink_prerequisite(id: &str, quest: &mut Quest) -> bool {
	let Some(req) = quest.requirements.as_mut() else {
		return false;
	};
	let before = req.required_quests_completed.len();
	req.required_quests_completed.retain(|p| p != id);
	let changed = req.required_quests_completed.len() != before;
	if changed {
		debug!("Unlinked prerequisite {id} from {}", quest.id);
	}
	changed
}

/// Recomputes every node's in-chain prerequisites from the edge set.
///
/// For each node the result is: prerequisites naming quests outside the chain
/// (kept in their order), then prerequisites backed by an incoming edge
/// (existing order first, new edge sources appended in edge order). In-chain
/// ids with no backing edge and duplicates are dropped.
pub fn reconcile(graph: &mut ChainGraph) {
	let (nodes, edges) = graph.parts_mut();
	let chain: HashSet<String> = nodes.iter().map(|n| n.id().to_owned()).collect();

	for node in nodes.iter_mut() {
		let sources: Vec<&str> = edges
			.iter()
			.filter(|e| e.to == node.id())
			.map(|e| e.from.as_str())
			.collect();

		let current = node.quest.prerequisites();
		let mut seen = HashSet::new();
		let mut next: Vec<String> = current
			.iter()
			.filter(|id| !chain.contains(id.as_str()) || sources.contains(&id.as_str()))
			.filter(|id| seen.insert(*id))
			.cloned()
			.collect();
		for source in sources {
			if !next.iter().any(|id| id == source) {
				next.push(source.to_owned());
			}
		}

		if next.as_slice() == current {
			continue;
		}
		debug!("Reconciled prerequisites of {}: {:?}", node.id(), next);
		node.quest
			.requirements
			.get_or_insert_with(Default::default)
			.required_quests_completed = next;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn quest_requiring(id: &str, prereqs: &[&str]) -> Quest {
		let mut quest = Quest::new(id, id);
		quest.requirements.get_or_insert_with(Default::default).required_quests_completed =
			prereqs.iter().map(|p| p.to_string()).collect();
		quest
	}

	#[test]
	fn link_initializes_missing_requirements() {
		let mut quest = Quest::new("b", "B");
		assert!(link_prerequisite("a", &mut quest));
		let req = quest.requirements.unwrap();
		assert_eq!(req.min_level, 1);
		assert_eq!(req.required_quests_completed, vec!["a".to_string()]);
	}

	#[test]
	fn link_is_idempotent() {
		let mut quest = quest_requiring("b", &["a"]);
		assert!(!link_prerequisite("a", &mut quest));
		assert!(!link_prerequisite("a", &mut quest));
		assert_eq!(quest.prerequisites(), ["a".to_string()]);
	}

	#[test]
	fn unlink_without_requirements_is_a_no_op() {
		let mut quest = Quest::new("b", "B");
		assert!(!unlink_prerequisite("a", &mut quest));
		assert!(quest.requirements.is_none());
	}

	#[test]
	fn reconcile_keeps_external_and_edge_backed_prerequisites() {
		let mut graph = ChainGraph::with_policy(SyncPolicy::AppendOnly);
		graph.add_node(&Quest::new("a", "A"));
		graph.add_node(&Quest::new("b", "B"));
		graph.add_node(&quest_requiring("c", &["outside", "a", "outside"]));
		graph.add_edge(1, 2);

		// a leaves the chain but stays in c's list
		graph.remove_node(0);
		graph.add_node(&Quest::new("z", "Z"));
		assert_eq!(graph.node(1).unwrap().quest.prerequisites().len(), 4);

		reconcile(&mut graph);
		assert_eq!(
			graph.node(1).unwrap().quest.prerequisites(),
			["outside".to_string(), "a".to_string(), "b".to_string()]
		);
	}

	#[test]
	fn reconcile_strips_in_chain_ids_without_edges() {
		let mut graph = ChainGraph::default();
		graph.add_node(&Quest::new("a", "A"));
		graph.add_node(&Quest::new("b", "B"));
		graph.add_edge(0, 1);
		graph.node_mut(0).unwrap().quest = quest_requiring("a", &["b", "gate"]);

		reconcile(&mut graph);
		assert_eq!(graph.node(0).unwrap().quest.prerequisites(), ["gate".to_string()]);
		assert_eq!(graph.node(1).unwrap().quest.prerequisites(), ["a".to_string()]);
	}

	#[test]
	fn reconcile_is_idempotent() {
		let mut graph = ChainGraph::default();
		graph.add_node(&Quest::new("a", "A"));
		graph.add_node(&quest_requiring("b", &["x"]));
		graph.add_edge(0, 1);

		reconcile(&mut graph);
		let once = graph.clone();
		reconcile(&mut graph);
		assert_eq!(graph, once);
	}

	#[test]
	fn reconcile_leaves_unconnected_quests_without_requirements() {
		let mut graph = ChainGraph::default();
		graph.add_node(&Quest::new("a", "A"));
		reconcile(&mut graph);
		assert!(graph.node(0).unwrap().quest.requirements.is_none());
	}

	#[test]
	fn reconcile_policy_syncs_on_every_mutation() {
		let mut graph = ChainGraph::with_policy(SyncPolicy::Reconcile);
		graph.add_node(&quest_requiring("c", &["b", "b"]));
		// b is outside the chain: kept, duplicate collapsed
		assert_eq!(graph.node(0).unwrap().quest.prerequisites(), ["b".to_string()]);

		// b joins without an edge, so the in-chain id is dropped
		graph.add_node(&Quest::new("b", "B"));
		assert!(graph.node(0).unwrap().quest.prerequisites().is_empty());

		assert!(graph.add_edge(1, 0));
		assert_eq!(graph.node(0).unwrap().quest.prerequisites(), ["b".to_string()]);

		graph.remove_node(1);
		assert!(graph.node(0).unwrap().quest.prerequisites().is_empty());
	}
}
