use log::{error, info};

use super::reconcile::{ReconcileReport, reconcile};
use super::scheduler::{CameraAction, LayoutDecision, LayoutScheduler};
use super::surface::{LayoutError, RenderSurface};
use super::types::GraphSnapshot;
use super::viewport::{ViewportCause, ViewportState, ViewportTracker};

#[derive(Debug)]
pub struct ApplyOutcome {
	pub report: ReconcileReport,
	pub decision: LayoutDecision,
	pub layout_error: Option<LayoutError>,
}

/// One graph view's worth of engine state: the surface it draws on, its
/// layout scheduler, and its camera tracker.
pub struct GraphSession<S> {
	pub surface: S,
	pub scheduler: LayoutScheduler,
	pub tracker: ViewportTracker,
}

impl<S: RenderSurface> GraphSession<S> {
	pub fn new(surface: S) -> Self {
		let tracker = ViewportTracker::new(surface.viewport());
		Self {
			surface,
			scheduler: LayoutScheduler::new(),
			tracker,
		}
	}

	/// Reconcile, lay out if needed, then capture or restore the camera.
	pub fn apply_snapshot(&mut self, snapshot: &GraphSnapshot) -> ApplyOutcome {
		let report = reconcile(&mut self.surface, snapshot);
		let decision = self
			.scheduler
			.after_reconcile(&report, self.tracker.restore());

		let layout_error = match decision.layout {
			Some(options) => {
				info!(
					"layout pass (randomize={}, fit={}) over {} nodes",
					options.randomize,
					options.fit,
					self.surface.model().node_count()
				);
				self.surface.run_layout(options).err()
			}
			None => None,
		};
		if let Some(err) = &layout_error {
			error!("layout failed: {err}");
		}
		self.scheduler.complete(&decision, layout_error.is_none());

		match decision.camera {
			CameraAction::CaptureBaseline => {
				if layout_error.is_none() {
					self.tracker.capture(self.surface.viewport());
				}
			}
			CameraAction::Restore(viewport) => {
				self.surface.set_viewport(viewport);
				self.tracker
					.observe(viewport, ViewportCause::Programmatic);
			}
		}

		ApplyOutcome {
			report,
			decision,
			layout_error,
		}
	}

	/// Camera change made by the operator (wheel, background drag).
	pub fn operator_viewport(&mut self, viewport: ViewportState) {
		self.surface.set_viewport(viewport);
		self.tracker.observe(viewport, ViewportCause::Operator);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::model::Position;
	use crate::components::topology::surface::{LayoutOptions, RecordingSurface};
	use crate::components::topology::types::{EdgeRecord, NodeRecord};

	fn snapshot(nodes: &[&str], edges: &[(&str, &str)]) -> GraphSnapshot {
		GraphSnapshot {
			nodes: nodes.iter().map(|id| NodeRecord::new(*id)).collect(),
			edges: edges
				.iter()
				.map(|(s, t)| EdgeRecord::new(*s, *t))
				.collect(),
			..GraphSnapshot::default()
		}
	}

	fn settled(nodes: &[&str], edges: &[(&str, &str)]) -> GraphSession<RecordingSurface> {
		let mut session = GraphSession::new(RecordingSurface {
			fit_to: ViewportState::new(0.8, 40.0, 30.0),
			..RecordingSurface::default()
		});
		session.apply_snapshot(&snapshot(nodes, edges));
		session
	}

	#[test]
	fn first_snapshot_fits_and_captures() {
		let session = settled(&["a", "b"], &[("a", "b")]);
		assert_eq!(session.surface.layouts, vec![LayoutOptions::initial()]);
		assert_eq!(session.tracker.restore(), ViewportState::new(0.8, 40.0, 30.0));
		assert!(session.scheduler.run_state().initial_layout_done());
	}

	#[test]
	fn repeated_snapshot_runs_no_layout() {
		let mut session = settled(&["a", "b"], &[("a", "b")]);
		let outcome = session.apply_snapshot(&snapshot(&["a", "b"], &[("a", "b")]));
		assert!(outcome.report.is_noop());
		assert_eq!(outcome.decision.layout, None);
		assert_eq!(session.surface.layouts.len(), 1);
	}

	#[test]
	fn growth_keeps_operator_framing() {
		let mut session = settled(&["a", "b"], &[("a", "b")]);
		let framing = ViewportState::new(2.0, 10.0, 5.0);
		session.operator_viewport(framing);

		session.apply_snapshot(&snapshot(&["a", "b", "x"], &[("a", "b")]));

		let last = session.surface.layouts.last().unwrap();
		assert!(!last.randomize && !last.fit);
		assert_eq!(session.surface.viewport_writes.last(), Some(&framing));
		assert_eq!(session.surface.viewport(), framing);
	}

	#[test]
	fn unchanged_snapshot_undoes_camera_drift() {
		let mut session = settled(&["a", "b"], &[("a", "b")]);
		let framing = ViewportState::new(2.0, 10.0, 5.0);
		session.operator_viewport(framing);
		session.surface.viewport = ViewportState::new(0.3, -400.0, 90.0);

		let outcome = session.apply_snapshot(&snapshot(&["a", "b"], &[("a", "b")]));

		assert_eq!(outcome.decision.layout, None);
		assert_eq!(session.surface.viewport(), framing);
		assert_eq!(session.tracker.restore(), framing);
		assert_eq!(session.surface.layouts.len(), 1);
	}

	#[test]
	fn pure_removal_runs_no_layout() {
		let mut session = settled(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let outcome = session.apply_snapshot(&snapshot(&["a", "b"], &[("a", "b")]));
		assert_eq!(outcome.report.removed_node_count, 1);
		assert_eq!(session.surface.layouts.len(), 1);
	}

	#[test]
	fn malformed_edge_does_not_stop_the_update() {
		let mut session = settled(&["a"], &[]);
		let outcome = session.apply_snapshot(&snapshot(&["a", "b"], &[("a", "nope"), ("a", "b")]));
		assert_eq!(outcome.report.warnings.len(), 1);
		assert_eq!(session.surface.edge_ids(), vec!["a->b".to_string()]);
	}

	#[test]
	fn failed_first_layout_leaves_baseline_untouched() {
		let mut session = GraphSession::new(RecordingSurface {
			fail_layout: true,
			..RecordingSurface::default()
		});
		let outcome = session.apply_snapshot(&snapshot(&["a"], &[]));
		assert!(outcome.layout_error.is_some());
		assert!(!session.scheduler.run_state().initial_layout_done());
		assert_eq!(session.tracker.restore(), ViewportState::default());
	}

	#[test]
	fn end_to_end_growth_from_pair_to_chain() {
		let mut session = settled(&["A", "B"], &[("A", "B")]);
		session.surface.model.set_position("A", Position::new(0.0, 0.0));
		session.surface.model.set_position("B", Position::new(60.0, 0.0));
		let before = session.surface.viewport();

		let mut next = snapshot(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
		next.edges[0].avg_latency = Some(42.0);
		let outcome = session.apply_snapshot(&next);

		assert_eq!(outcome.report.added_node_ids, vec!["C"]);
		assert_eq!(outcome.report.added_edge_ids, vec!["B->C"]);
		assert_eq!(outcome.report.updated_edge_count, 1);
		assert_eq!(
			session.surface.model.edge("A->B").unwrap().record.avg_latency,
			Some(42.0)
		);
		assert_eq!(outcome.decision.layout, Some(LayoutOptions::incremental()));
		assert_eq!(session.surface.viewport(), before);
		assert_eq!(session.surface.model.position("A"), Some(Position::new(0.0, 0.0)));
		assert_eq!(session.surface.model.position("B"), Some(Position::new(60.0, 0.0)));
	}
}
