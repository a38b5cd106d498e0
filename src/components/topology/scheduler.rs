use log::info;

use super::reconcile::ReconcileReport;
use super::surface::LayoutOptions;
use super::viewport::ViewportState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPhase {
	/// No layout has ever completed.
	Uninitialized,
	/// Laid out, nothing new since.
	Stable,
	/// New nodes arrived and their incremental pass has not completed.
	Growing,
}

/// Set once, after the first successful fit-to-content pass. Never reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutRunState {
	initial_layout_done: bool,
}

impl LayoutRunState {
	pub fn initial_layout_done(&self) -> bool {
		self.initial_layout_done
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraAction {
	/// Take whatever the layout framed as the new baseline.
	CaptureBaseline,
	/// Put the operator's framing back.
	Restore(ViewportState),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutDecision {
	pub layout: Option<LayoutOptions>,
	pub camera: CameraAction,
}

/// Decides, after each reconciliation, whether layout runs and what happens
/// to the camera.
#[derive(Clone, Debug)]
pub struct LayoutScheduler {
	phase: LayoutPhase,
	run_state: LayoutRunState,
}

impl Default for LayoutScheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl LayoutScheduler {
	pub fn new() -> Self {
		Self {
			phase: LayoutPhase::Uninitialized,
			run_state: LayoutRunState::default(),
		}
	}

	pub fn phase(&self) -> LayoutPhase {
		self.phase
	}

	pub fn run_state(&self) -> LayoutRunState {
		self.run_state
	}

	pub fn after_reconcile(&mut self, report: &ReconcileReport, baseline: ViewportState) -> LayoutDecision {
		match self.phase {
			LayoutPhase::Uninitialized => LayoutDecision {
				layout: Some(LayoutOptions::initial()),
				camera: CameraAction::CaptureBaseline,
			},
			LayoutPhase::Stable if report.added_node_ids.is_empty() => LayoutDecision {
				layout: None,
				camera: CameraAction::Restore(baseline),
			},
			LayoutPhase::Stable | LayoutPhase::Growing => {
				self.phase = LayoutPhase::Growing;
				LayoutDecision {
					layout: Some(LayoutOptions::incremental()),
					camera: CameraAction::Restore(baseline),
				}
			}
		}
	}

	/// Records whether the decided layout pass went through.
	pub fn complete(&mut self, decision: &LayoutDecision, succeeded: bool) {
		if decision.layout.is_none() || !succeeded {
			return;
		}
		if !self.run_state.initial_layout_done {
			self.run_state.initial_layout_done = true;
			info!("initial layout done");
		}
		self.phase = LayoutPhase::Stable;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn report_adding(ids: &[&str]) -> ReconcileReport {
		ReconcileReport {
			added_node_ids: ids.iter().map(|s| s.to_string()).collect(),
			..ReconcileReport::default()
		}
	}

	fn stable() -> LayoutScheduler {
		let mut scheduler = LayoutScheduler::new();
		let decision = scheduler.after_reconcile(&report_adding(&["a"]), ViewportState::default());
		scheduler.complete(&decision, true);
		scheduler
	}

	#[test]
	fn first_reconcile_runs_full_layout() {
		let mut scheduler = LayoutScheduler::new();
		let decision = scheduler.after_reconcile(&ReconcileReport::default(), ViewportState::default());
		assert_eq!(decision.layout, Some(LayoutOptions::initial()));
		assert_eq!(decision.camera, CameraAction::CaptureBaseline);
		assert!(!scheduler.run_state().initial_layout_done());

		scheduler.complete(&decision, true);
		assert!(scheduler.run_state().initial_layout_done());
		assert_eq!(scheduler.phase(), LayoutPhase::Stable);
	}

	#[test]
	fn failed_initial_layout_retries() {
		let mut scheduler = LayoutScheduler::new();
		let decision = scheduler.after_reconcile(&report_adding(&["a"]), ViewportState::default());
		scheduler.complete(&decision, false);
		assert_eq!(scheduler.phase(), LayoutPhase::Uninitialized);

		let decision = scheduler.after_reconcile(&ReconcileReport::default(), ViewportState::default());
		assert_eq!(decision.layout, Some(LayoutOptions::initial()));
	}

	#[test]
	fn no_additions_only_restores_camera() {
		let mut scheduler = stable();
		let baseline = ViewportState::new(2.0, 10.0, 5.0);
		let removal = ReconcileReport {
			removed_node_count: 3,
			..ReconcileReport::default()
		};
		let decision = scheduler.after_reconcile(&removal, baseline);
		assert_eq!(decision.layout, None);
		assert_eq!(decision.camera, CameraAction::Restore(baseline));
		assert_eq!(scheduler.phase(), LayoutPhase::Stable);
	}

	#[test]
	fn growth_runs_incremental_layout() {
		let mut scheduler = stable();
		let baseline = ViewportState::new(2.0, 10.0, 5.0);
		let decision = scheduler.after_reconcile(&report_adding(&["c"]), baseline);
		let options = decision.layout.unwrap();
		assert!(!options.randomize);
		assert!(!options.fit);
		assert_eq!(decision.camera, CameraAction::Restore(baseline));
		assert_eq!(scheduler.phase(), LayoutPhase::Growing);

		scheduler.complete(&decision, true);
		assert_eq!(scheduler.phase(), LayoutPhase::Stable);
	}

	#[test]
	fn failed_growth_pass_is_retried_without_new_nodes() {
		let mut scheduler = stable();
		let decision = scheduler.after_reconcile(&report_adding(&["c"]), ViewportState::default());
		scheduler.complete(&decision, false);

		let decision = scheduler.after_reconcile(&ReconcileReport::default(), ViewportState::default());
		assert_eq!(decision.layout, Some(LayoutOptions::incremental()));
	}
}
