use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use thiserror::Error;

use super::surface::RenderSurface;
use super::types::{EdgeRecord, GraphSnapshot, NodeRecord};

/// Something in a snapshot that could not be applied as-is.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntegrityWarning {
	#[error("edge {edge_id} references missing node {missing}, skipped")]
	DanglingEdge { edge_id: String, missing: String },
	#[error("node id {0} appears more than once, last record wins")]
	DuplicateNodeId(String),
	#[error("edge id {0} appears more than once, last record wins")]
	DuplicateEdgeId(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
	pub added_node_ids: Vec<String>,
	pub removed_node_count: usize,
	pub updated_node_count: usize,
	pub added_edge_ids: Vec<String>,
	/// Includes edges dropped because an endpoint node went away.
	pub removed_edge_count: usize,
	pub updated_edge_count: usize,
	pub warnings: Vec<IntegrityWarning>,
}

impl ReconcileReport {
	#[cfg(test)]
	pub fn is_noop(&self) -> bool {
		self.added_node_ids.is_empty()
			&& self.removed_node_count == 0
			&& self.added_edge_ids.is_empty()
			&& self.removed_edge_count == 0
	}
}

/// Brings the surface's graph in line with `snapshot`, touching only what
/// differs. Existing nodes keep their positions; new nodes get none.
pub fn reconcile<S: RenderSurface + ?Sized>(
	surface: &mut S,
	snapshot: &GraphSnapshot,
) -> ReconcileReport {
	let mut report = ReconcileReport::default();

	let (mut node_lookup, node_order) = index_nodes(&snapshot.nodes, &mut report.warnings);
	let snapshot_node_ids: HashSet<String> = node_order.iter().cloned().collect();

	for id in surface.node_ids() {
		match node_lookup.remove(&id) {
			Some(record) => {
				surface.update_node_data(record.clone());
				report.updated_node_count += 1;
			}
			None => {
				report.removed_edge_count += surface.remove_node(&id).len();
				report.removed_node_count += 1;
			}
		}
	}
	for id in node_order {
		if let Some(record) = node_lookup.remove(&id) {
			surface.add_node(record.clone());
			report.added_node_ids.push(id);
		}
	}

	let (mut edge_lookup, edge_order) = index_edges(&snapshot.edges, &mut report.warnings);

	for id in surface.edge_ids() {
		match edge_lookup.remove(&id) {
			Some(record) => match dangling_endpoint(record, &snapshot_node_ids) {
				None => {
					let bottleneck = snapshot.is_bottleneck(record);
					match surface.update_edge_data(record.clone(), bottleneck) {
						Ok(true) => report.updated_edge_count += 1,
						Ok(false) => {}
						Err(err) => report.warnings.push(IntegrityWarning::DanglingEdge {
							edge_id: id,
							missing: err.missing,
						}),
					}
				}
				Some(missing) => {
					surface.remove_edge(&id);
					report.removed_edge_count += 1;
					report
						.warnings
						.push(IntegrityWarning::DanglingEdge { edge_id: id, missing });
				}
			},
			None => {
				if surface.remove_edge(&id) {
					report.removed_edge_count += 1;
				}
			}
		}
	}
	for id in edge_order {
		let Some(record) = edge_lookup.remove(&id) else {
			continue;
		};
		if let Some(missing) = dangling_endpoint(record, &snapshot_node_ids) {
			report
				.warnings
				.push(IntegrityWarning::DanglingEdge { edge_id: id, missing });
			continue;
		}
		match surface.add_edge(record.clone(), snapshot.is_bottleneck(record)) {
			Ok(()) => report.added_edge_ids.push(id),
			Err(err) => report.warnings.push(IntegrityWarning::DanglingEdge {
				edge_id: id,
				missing: err.missing,
			}),
		}
	}

	for warning in &report.warnings {
		warn!("graph snapshot: {warning}");
	}
	debug!(
		"reconciled: +{} -{} ~{} nodes, +{} -{} ~{} edges",
		report.added_node_ids.len(),
		report.removed_node_count,
		report.updated_node_count,
		report.added_edge_ids.len(),
		report.removed_edge_count,
		report.updated_edge_count
	);
	report
}

/// Id lookup plus first-seen order, so additions come out in snapshot order.
fn index_nodes<'a>(
	records: &'a [NodeRecord],
	warnings: &mut Vec<IntegrityWarning>,
) -> (HashMap<String, &'a NodeRecord>, Vec<String>) {
	let mut lookup = HashMap::with_capacity(records.len());
	let mut order = Vec::with_capacity(records.len());
	for record in records {
		if lookup.insert(record.id.clone(), record).is_some() {
			warnings.push(IntegrityWarning::DuplicateNodeId(record.id.clone()));
		} else {
			order.push(record.id.clone());
		}
	}
	(lookup, order)
}

fn index_edges<'a>(
	records: &'a [EdgeRecord],
	warnings: &mut Vec<IntegrityWarning>,
) -> (HashMap<String, &'a EdgeRecord>, Vec<String>) {
	let mut lookup = HashMap::with_capacity(records.len());
	let mut order = Vec::with_capacity(records.len());
	for record in records {
		if lookup.insert(record.id.clone(), record).is_some() {
			warnings.push(IntegrityWarning::DuplicateEdgeId(record.id.clone()));
		} else {
			order.push(record.id.clone());
		}
	}
	(lookup, order)
}

fn dangling_endpoint(record: &EdgeRecord, nodes: &HashSet<String>) -> Option<String> {
	[&record.source, &record.target]
		.into_iter()
		.find(|id| !nodes.contains(*id))
		.cloned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::model::{DanglingEndpoint, Position, VisualGraphModel};
	use crate::components::topology::surface::{LayoutError, LayoutOptions, RecordingSurface};
	use crate::components::topology::viewport::ViewportState;

	fn node(id: &str, load: f64) -> NodeRecord {
		NodeRecord {
			load: Some(load),
			..NodeRecord::new(id)
		}
	}

	fn snapshot(nodes: &[&str], edges: &[(&str, &str)]) -> GraphSnapshot {
		GraphSnapshot {
			nodes: nodes.iter().map(|id| node(id, 1.0)).collect(),
			edges: edges
				.iter()
				.map(|(s, t)| EdgeRecord::new(*s, *t))
				.collect(),
			..GraphSnapshot::default()
		}
	}

	fn ids(mut v: Vec<String>) -> Vec<String> {
		v.sort();
		v
	}

	#[test]
	fn first_snapshot_adds_everything_in_order() {
		let mut surface = RecordingSurface::default();
		let report = reconcile(&mut surface, &snapshot(&["b", "a"], &[("a", "b")]));
		assert_eq!(report.added_node_ids, vec!["b", "a"]);
		assert_eq!(report.added_edge_ids, vec!["a->b"]);
		assert_eq!(report.removed_node_count, 0);
		assert!(surface.model.unpositioned_ids().len() == 2);
	}

	#[test]
	fn identical_snapshot_is_idempotent() {
		let mut surface = RecordingSurface::default();
		let snap = snapshot(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		reconcile(&mut surface, &snap);
		let second = reconcile(&mut surface, &snap);
		assert!(second.is_noop());
		assert_eq!(second.updated_node_count, 3);
		assert_eq!(second.updated_edge_count, 2);
	}

	#[test]
	fn id_sets_match_snapshot() {
		let mut surface = RecordingSurface::default();
		reconcile(
			&mut surface,
			&snapshot(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d"), ("b", "d")]),
		);
		let next = snapshot(&["b", "d", "e"], &[("b", "d"), ("d", "e")]);
		let report = reconcile(&mut surface, &next);

		assert_eq!(ids(surface.node_ids()), vec!["b", "d", "e"]);
		assert_eq!(ids(surface.edge_ids()), vec!["b->d", "d->e"]);
		assert_eq!(report.removed_node_count, 2);
		assert_eq!(report.removed_edge_count, 2);
	}

	#[test]
	fn positions_survive_attribute_refresh() {
		let mut surface = RecordingSurface::default();
		reconcile(&mut surface, &snapshot(&["a", "b"], &[("a", "b")]));
		surface.model.set_position("a", Position::new(12.5, -3.0));

		let mut next = snapshot(&["a", "b"], &[("a", "b")]);
		next.nodes[0].load = Some(180.0);
		reconcile(&mut surface, &next);

		let a = surface.model.node("a").unwrap();
		assert_eq!(a.record.load, Some(180.0));
		assert_eq!(a.position, Some(Position::new(12.5, -3.0)));
	}

	#[test]
	fn dangling_edge_is_skipped_with_warning() {
		let mut surface = RecordingSurface::default();
		let snap = snapshot(&["a", "b"], &[("a", "b"), ("b", "ghost")]);
		let report = reconcile(&mut surface, &snap);

		assert_eq!(ids(surface.edge_ids()), vec!["a->b"]);
		assert_eq!(
			report.warnings,
			vec![IntegrityWarning::DanglingEdge {
				edge_id: "b->ghost".into(),
				missing: "ghost".into(),
			}]
		);
	}

	#[test]
	fn existing_edge_pointing_at_vanished_node_is_dropped() {
		let mut surface = RecordingSurface::default();
		reconcile(&mut surface, &snapshot(&["a", "b", "c"], &[("a", "b")]));

		// same edge id, endpoint renamed to a node the snapshot lacks
		let mut next = snapshot(&["a", "b", "c"], &[]);
		let mut edge = EdgeRecord::new("a", "b");
		edge.target = "zz".into();
		next.edges.push(edge);
		let report = reconcile(&mut surface, &next);

		assert!(surface.edge_ids().is_empty());
		assert_eq!(report.removed_edge_count, 1);
		assert_eq!(report.warnings.len(), 1);
	}

	/// Surface whose edge updates always report a missing endpoint.
	#[derive(Default)]
	struct RejectingUpdates(RecordingSurface);

	impl RenderSurface for RejectingUpdates {
		fn model(&self) -> &VisualGraphModel {
			&self.0.model
		}

		fn model_mut(&mut self) -> &mut VisualGraphModel {
			&mut self.0.model
		}

		fn run_layout(&mut self, options: LayoutOptions) -> Result<(), LayoutError> {
			self.0.run_layout(options)
		}

		fn viewport(&self) -> ViewportState {
			self.0.viewport()
		}

		fn set_viewport(&mut self, viewport: ViewportState) {
			self.0.set_viewport(viewport)
		}

		fn update_edge_data(
			&mut self,
			record: EdgeRecord,
			_bottleneck: bool,
		) -> Result<bool, DanglingEndpoint> {
			Err(DanglingEndpoint {
				missing: record.target,
			})
		}
	}

	#[test]
	fn failed_edge_update_is_reported() {
		let mut surface = RejectingUpdates::default();
		let snap = snapshot(&["a", "b"], &[("a", "b")]);
		reconcile(&mut surface, &snap);
		let report = reconcile(&mut surface, &snap);
		assert_eq!(report.updated_edge_count, 0);
		assert_eq!(
			report.warnings,
			vec![IntegrityWarning::DanglingEdge {
				edge_id: "a->b".into(),
				missing: "b".into(),
			}]
		);
	}

	#[test]
	fn duplicate_ids_keep_last_record() {
		let mut surface = RecordingSurface::default();
		let snap = GraphSnapshot {
			nodes: vec![node("a", 1.0), node("a", 7.0)],
			..GraphSnapshot::default()
		};
		let report = reconcile(&mut surface, &snap);
		assert_eq!(report.added_node_ids, vec!["a"]);
		assert_eq!(surface.model.node("a").unwrap().record.load, Some(7.0));
		assert_eq!(
			report.warnings,
			vec![IntegrityWarning::DuplicateNodeId("a".into())]
		);
	}

	#[test]
	fn bottleneck_flag_tracks_snapshot() {
		let mut surface = RecordingSurface::default();
		let mut snap = snapshot(&["a", "b"], &[("a", "b")]);
		reconcile(&mut surface, &snap);
		assert!(!surface.model.edge("a->b").unwrap().bottleneck);

		snap.bottlenecks.push("a->b".into());
		reconcile(&mut surface, &snap);
		assert!(surface.model.edge("a->b").unwrap().bottleneck);
	}
}
