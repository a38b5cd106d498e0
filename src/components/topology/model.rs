use std::collections::{BTreeMap, HashSet};

use super::types::{EdgeRecord, NodeRecord};

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

#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	pub record: NodeRecord,
	/// `None` until a layout pass places the node.
	pub position: Option<Position>,
	/// Set when the operator dragged the node.
	pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualEdge {
	pub record: EdgeRecord,
	pub bottleneck: bool,
}

/// Axis-aligned box around every positioned node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> Position {
		Position::new(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// An edge could not be inserted because an endpoint is not in the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingEndpoint {
	pub missing: String,
}

/// The live node/edge set the canvas draws, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct VisualGraphModel {
	nodes: BTreeMap<String, VisualNode>,
	edges: BTreeMap<String, VisualEdge>,
}

impl VisualGraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn node(&self, id: &str) -> Option<&VisualNode> {
		self.nodes.get(id)
	}

	pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
		self.edges.get(id)
	}

	pub fn node_ids(&self) -> Vec<String> {
		self.nodes.keys().cloned().collect()
	}

	pub fn edge_ids(&self) -> Vec<String> {
		self.edges.keys().cloned().collect()
	}

	pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
		self.nodes.values()
	}

	pub fn edges(&self) -> impl Iterator<Item = &VisualEdge> {
		self.edges.values()
	}

	/// Inserts a node without a position. Replaces the data of an existing
	/// node with the same id but keeps its position.
	pub fn insert_node(&mut self, record: NodeRecord) {
		if self.update_node_data(record.clone()) {
			return;
		}
		self.nodes.insert(
			record.id.clone(),
			VisualNode {
				record,
				position: None,
				pinned: false,
			},
		);
	}

	pub fn insert_edge(&mut self, record: EdgeRecord, bottleneck: bool) -> Result<(), DanglingEndpoint> {
		self.check_endpoints(&record)?;
		self.edges
			.insert(record.id.clone(), VisualEdge { record, bottleneck });
		Ok(())
	}

	/// Overwrites a node's attributes in place. Returns false if unknown.
	pub fn update_node_data(&mut self, record: NodeRecord) -> bool {
		match self.nodes.get_mut(&record.id) {
			Some(node) => {
				node.record = record;
				true
			}
			None => false,
		}
	}

	/// Overwrites an edge's attributes in place. The refreshed endpoints must
	/// exist; `Ok(false)` means the id is unknown.
	pub fn update_edge_data(
		&mut self,
		record: EdgeRecord,
		bottleneck: bool,
	) -> Result<bool, DanglingEndpoint> {
		self.check_endpoints(&record)?;
		match self.edges.get_mut(&record.id) {
			Some(edge) => {
				edge.record = record;
				edge.bottleneck = bottleneck;
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Removes a node and every edge touching it. Returns the removed edge ids.
	pub fn remove_node(&mut self, id: &str) -> Option<Vec<String>> {
		self.nodes.remove(id)?;
		let incident: Vec<String> = self
			.edges
			.iter()
			.filter(|(_, e)| e.record.source == id || e.record.target == id)
			.map(|(edge_id, _)| edge_id.clone())
			.collect();
		for edge_id in &incident {
			self.edges.remove(edge_id);
		}
		Some(incident)
	}

	pub fn remove_edge(&mut self, id: &str) -> bool {
		self.edges.remove(id).is_some()
	}

	pub fn set_position(&mut self, id: &str, position: Position) {
		if let Some(node) = self.nodes.get_mut(id) {
			node.position = Some(position);
		}
	}

	pub fn pin(&mut self, id: &str, position: Position) {
		if let Some(node) = self.nodes.get_mut(id) {
			node.position = Some(position);
			node.pinned = true;
		}
	}

	pub fn position(&self, id: &str) -> Option<Position> {
		self.nodes.get(id).and_then(|n| n.position)
	}

	pub fn unpositioned_ids(&self) -> Vec<String> {
		self.nodes
			.values()
			.filter(|n| n.position.is_none())
			.map(|n| n.record.id.clone())
			.collect()
	}

	/// Ids of nodes sharing an edge with `id`, in either direction.
	pub fn neighbors(&self, id: &str) -> HashSet<String> {
		let mut out = HashSet::new();
		for edge in self.edges.values() {
			if edge.record.source == id {
				out.insert(edge.record.target.clone());
			} else if edge.record.target == id {
				out.insert(edge.record.source.clone());
			}
		}
		out
	}

	pub fn bounds(&self) -> Option<Bounds> {
		let mut positions = self.nodes.values().filter_map(|n| n.position);
		let first = positions.next()?;
		let mut bounds = Bounds {
			min_x: first.x,
			min_y: first.y,
			max_x: first.x,
			max_y: first.y,
		};
		for p in positions {
			bounds.min_x = bounds.min_x.min(p.x);
			bounds.min_y = bounds.min_y.min(p.y);
			bounds.max_x = bounds.max_x.max(p.x);
			bounds.max_y = bounds.max_y.max(p.y);
		}
		Some(bounds)
	}

	fn check_endpoints(&self, record: &EdgeRecord) -> Result<(), DanglingEndpoint> {
		for endpoint in [&record.source, &record.target] {
			if !self.nodes.contains_key(endpoint) {
				return Err(DanglingEndpoint {
					missing: endpoint.clone(),
				});
			}
		}
		Ok(())
	}
}
