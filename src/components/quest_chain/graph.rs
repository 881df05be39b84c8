use log::{debug, info};

use super::layout::grid_position;
use super::sync::{self, SyncPolicy};
use super::types::{Edge, QuestNode};
use crate::api::Quest;

/// The chain being edited: an ordered node sequence plus prerequisite edges.
///
/// Edges are keyed by quest id, so removing a node is a filter over the edge
/// set. Callers still address nodes by their position in the sequence, and
/// [`ChainGraph::index_edges`] gives the positional view of the edge set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainGraph {
	nodes: Vec<QuestNode>,
	edges: Vec<Edge>,
	policy: SyncPolicy,
}

impl ChainGraph {
	pub fn with_policy(policy: SyncPolicy) -> Self {
		Self {
			policy,
			..Self::default()
		}
	}

	pub fn nodes(&self) -> &[QuestNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn node(&self, index: usize) -> Option<&QuestNode> {
		self.nodes.get(index)
	}

	pub fn node_mut(&mut self, index: usize) -> Option<&mut QuestNode> {
		self.nodes.get_mut(index)
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id() == id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index_of(id).is_some()
	}

	/// Quests that may still be added: the collection minus chain members.
	pub fn candidates<'a>(&self, quests: &'a [Quest]) -> Vec<&'a Quest> {
		quests.iter().filter(|q| !self.contains(&q.id)).collect()
	}

	/// Edge set as `(from, to)` positions in the current node sequence.
	pub fn index_edges(&self) -> Vec<(usize, usize)> {
		self.edges
			.iter()
			.filter_map(|e| Some((self.index_of(&e.from)?, self.index_of(&e.to)?)))
			.collect()
	}

	pub fn has_edge(&self, from_id: &str, to_id: &str) -> bool {
		self.edges.iter().any(|e| e.from == from_id && e.to == to_id)
	}

	/// Appends a deep copy of `quest` and returns its index.
	///
	/// Duplicate ids are not checked here; offer only [`ChainGraph::candidates`].
	/// The grid is re-applied to every node.
	pub fn add_node(&mut self, quest: &Quest) -> usize {
		let index = self.nodes.len();
		self.nodes.push(QuestNode {
			quest: quest.clone(),
			position: grid_position(index),
		});
		if self.policy == SyncPolicy::Reconcile {
			sync::reconcile(self);
		}
		self.relayout();
		info!("Added quest {} to chain at {}", quest.id, index);
		index
	}

	/// Removes the node at `index` and every edge touching it.
	///
	/// Out-of-range indices are ignored. Positions are re-laid out afterwards.
	pub fn remove_node(&mut self, index: usize) -> Option<QuestNode> {
		if index >= self.nodes.len() {
			debug!("Ignoring removal of node {index}, chain has {}", self.nodes.len());
			return None;
		}
		let removed = self.nodes.remove(index);
		let id = removed.id();

		let dependents: Vec<String> = self
			.edges
			.iter()
			.filter(|e| e.from == id)
			.map(|e| e.to.clone())
			.collect();
		self.edges.retain(|e| !e.touches(id));

		if self.policy != SyncPolicy::AppendOnly {
			for node in self.nodes.iter_mut().filter(|n| dependents.iter().any(|d| d == n.id())) {
				sync::unlink_prerequisite(id, &mut node.quest);
			}
		}
		if self.policy == SyncPolicy::Reconcile {
			sync::reconcile(self);
		}
		self.relayout();
		info!("Removed quest {id} from chain");
		Some(removed)
	}

	/// Records `from` as a prerequisite of `to`.
	///
	/// Returns `false` without touching anything for self-loops (by index or
	/// by id), out-of-range indices and edges that already exist.
	pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
		if from == to || from >= self.nodes.len() || to >= self.nodes.len() {
			debug!("Rejected edge {from} -> {to}");
			return false;
		}
		let from_id = self.nodes[from].id().to_owned();
		let to_id = self.nodes[to].id().to_owned();
		if from_id == to_id {
			debug!("Rejected self-loop on {from_id}");
			return false;
		}
		if self.has_edge(&from_id, &to_id) {
			debug!("Edge {from_id} -> {to_id} already exists");
			return false;
		}

		self.edges.push(Edge::new(from_id.as_str(), to_id.as_str()));
		sync::link_prerequisite(&from_id, &mut self.nodes[to].quest);
		if self.policy == SyncPolicy::Reconcile {
			sync::reconcile(self);
		}
		info!("Connected {from_id} -> {to_id}");
		true
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		info!("Chain cleared");
	}

	/// Resets every node to its grid slot.
	pub fn relayout(&mut self) {
		for (i, node) in self.nodes.iter_mut().enumerate() {
			node.position = grid_position(i);
		}
	}

	/// Owned copies of the chain's quests, in node order.
	pub fn quests(&self) -> Vec<Quest> {
		self.nodes.iter().map(|n| n.quest.clone()).collect()
	}

	pub(super) fn parts_mut(&mut self) -> (&mut [QuestNode], &[Edge]) {
		(&mut self.nodes, &self.edges)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::quest_chain::types::Position;

	fn quest(id: &str) -> Quest {
		Quest::new(id, id.to_uppercase())
	}

	fn chain(ids: &[&str]) -> ChainGraph {
		let mut graph = ChainGraph::default();
		for id in ids {
			graph.add_node(&quest(id));
		}
		graph
	}

	#[test]
	fn add_node_appends_at_old_length() {
		let mut graph = chain(&["a", "b"]);
		assert_eq!(graph.add_node(&quest("c")), 2);
		assert_eq!(graph.len(), 3);
		assert_eq!(graph.node(2).unwrap().id(), "c");
	}

	#[test]
	fn add_node_takes_a_detached_copy() {
		let mut source = quest("a");
		let mut graph = ChainGraph::default();
		graph.add_node(&source);
		source.title = "Renamed".into();
		assert_eq!(graph.node(0).unwrap().title(), "A");
	}

	#[test]
	fn candidates_exclude_chain_members() {
		let quests = vec![quest("a"), quest("b"), quest("c")];
		let mut graph = ChainGraph::default();
		graph.add_node(&quests[1]);

		let ids: Vec<&str> = graph.candidates(&quests).iter().map(|q| q.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "c"]);

		for q in graph.candidates(&quests).into_iter().cloned().collect::<Vec<_>>() {
			graph.add_node(&q);
		}
		assert!(graph.candidates(&quests).is_empty());
		let mut ids: Vec<&str> = graph.nodes().iter().map(|n| n.id()).collect();
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), graph.len());
	}

	#[test]
	fn self_loops_are_rejected() {
		let mut graph = chain(&["a", "b", "c"]);
		for i in 0..3 {
			assert!(!graph.add_edge(i, i));
		}
		assert!(graph.edges().is_empty());
		assert!(graph.nodes().iter().all(|n| n.quest.requirements.is_none()));
	}

	#[test]
	fn out_of_range_edges_are_rejected() {
		let mut graph = chain(&["a", "b"]);
		assert!(!graph.add_edge(0, 2));
		assert!(!graph.add_edge(5, 1));
		assert!(graph.edges().is_empty());
	}

	#[test]
	fn duplicate_edge_is_stored_once() {
		let mut graph = chain(&["a", "b"]);
		assert!(graph.add_edge(0, 1));
		assert!(!graph.add_edge(0, 1));
		assert_eq!(graph.index_edges(), vec![(0, 1)]);
	}

	#[test]
	fn add_edge_records_prerequisite_on_target() {
		let mut graph = chain(&["a", "b"]);
		graph.add_edge(0, 1);

		let req = graph.node(1).unwrap().quest.requirements.as_ref().unwrap();
		assert_eq!(req.min_level, 1);
		assert_eq!(req.required_quests_completed, vec!["a".to_string()]);
		assert!(graph.node(0).unwrap().quest.requirements.is_none());
	}

	#[test]
	fn connect_over_existing_prerequisite_adds_edge_only() {
		let mut b = quest("b");
		b.requirements.get_or_insert_with(Default::default).required_quests_completed =
			vec!["x".into(), "a".into()];
		let mut graph = ChainGraph::default();
		graph.add_node(&b);
		graph.add_node(&quest("a"));
		assert!(graph.edges().is_empty());

		assert!(graph.add_edge(1, 0));
		assert_eq!(graph.index_edges(), vec![(1, 0)]);
		assert_eq!(graph.node(0).unwrap().quest.prerequisites(), ["x".to_string(), "a".to_string()]);
	}

	#[test]
	fn readding_a_removed_quest_brings_no_edges_back() {
		let mut graph = ChainGraph::with_policy(SyncPolicy::AppendOnly);
		graph.add_node(&quest("a"));
		graph.add_node(&quest("b"));
		graph.add_edge(0, 1);
		graph.remove_node(0);
		graph.add_node(&quest("a"));

		assert!(graph.edges().is_empty());
		assert!(graph.add_edge(1, 0));
		assert_eq!(graph.node(0).unwrap().quest.prerequisites(), ["a".to_string()]);
	}

	#[test]
	fn same_id_on_two_nodes_is_not_a_self_loop() {
		let mut graph = chain(&["a", "a"]);
		assert!(!graph.add_edge(0, 1));
		assert!(graph.edges().is_empty());
		assert!(graph.node(1).unwrap().quest.requirements.is_none());
	}

	#[test]
	fn removal_drops_touching_edges_and_shifts_the_rest() {
		let mut graph = chain(&["a", "b", "c", "d"]);
		graph.add_edge(0, 2);
		graph.add_edge(1, 3);

		let removed = graph.remove_node(1).unwrap();
		assert_eq!(removed.id(), "b");
		let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id()).collect();
		assert_eq!(ids, vec!["a", "c", "d"]);
		assert_eq!(graph.index_edges(), vec![(0, 1)]);
	}

	#[test]
	fn removal_out_of_range_is_a_no_op() {
		let mut graph = chain(&["a", "b"]);
		graph.add_edge(0, 1);
		let before = graph.clone();
		assert!(graph.remove_node(2).is_none());
		assert_eq!(graph, before);
	}

	#[test]
	fn removal_prunes_removed_id_from_dependents_by_default() {
		let mut graph = chain(&["a", "b", "c"]);
		graph.add_edge(0, 1);
		graph.add_edge(0, 2);
		graph.add_edge(1, 2);

		graph.remove_node(0);
		assert!(graph.node(0).unwrap().quest.prerequisites().is_empty());
		assert_eq!(graph.node(1).unwrap().quest.prerequisites(), ["b".to_string()]);
	}

	#[test]
	fn append_only_keeps_prerequisites_of_removed_nodes() {
		let mut graph = ChainGraph::with_policy(SyncPolicy::AppendOnly);
		graph.add_node(&quest("a"));
		graph.add_node(&quest("b"));
		graph.add_edge(0, 1);

		graph.remove_node(0);
		assert!(graph.edges().is_empty());
		assert_eq!(graph.node(0).unwrap().quest.prerequisites(), ["a".to_string()]);
	}

	#[test]
	fn removal_relays_out_survivors() {
		let mut graph = chain(&["a", "b", "c", "d"]);
		graph.node_mut(3).unwrap().position = Position::new(999.0, 999.0);
		graph.remove_node(0);
		assert_eq!(graph.node(2).unwrap().position, grid_position(2));
	}

	#[test]
	fn clear_resets_everything() {
		let mut graph = chain(&["a", "b", "c", "d", "e"]);
		graph.add_edge(0, 1);
		graph.add_edge(2, 4);
		graph.clear();
		assert_eq!(graph.len(), 0);
		assert!(graph.edges().is_empty());
		assert!(graph.index_edges().is_empty());
	}

	#[test]
	fn new_nodes_land_on_the_grid() {
		let graph = chain(&["a", "b", "c", "d"]);
		assert_eq!(graph.node(0).unwrap().position, Position::new(50.0, 50.0));
		assert_eq!(graph.node(2).unwrap().position, Position::new(650.0, 50.0));
		assert_eq!(graph.node(3).unwrap().position, Position::new(50.0, 250.0));
	}

	#[test]
	fn adding_a_node_relays_out_the_chain() {
		let mut graph = chain(&["a", "b"]);
		graph.node_mut(0).unwrap().position = Position::new(999.0, 999.0);
		graph.add_node(&quest("c"));
		assert_eq!(graph.node(0).unwrap().position, grid_position(0));
		assert_eq!(graph.node(2).unwrap().position, grid_position(2));
	}
}
