use leptos::prelude::*;

use crate::api::StatsResponse;
use crate::components::topology::NodeStatus;

/// Dot class and caption for the overall health badge.
pub fn status_badge(status: NodeStatus) -> (&'static str, &'static str) {
	match status {
		NodeStatus::Critical => ("sfa-dot sfa-dot-critical", "Critical"),
		NodeStatus::Warning => ("sfa-dot sfa-dot-warn", "Degradation"),
		_ => ("sfa-dot sfa-dot-ok", "Normal"),
	}
}

pub fn format_max_flow(max_flow: Option<f64>) -> String {
	max_flow
		.map(|v| format!("{v:.4}"))
		.unwrap_or_else(|| "-".into())
}

/// Stats win when they carry the value; otherwise the graph export's.
pub fn resolve_max_flow(stats: Option<f64>, graph: Option<f64>) -> Option<f64> {
	stats.or(graph)
}

#[component]
pub fn KpiPanel(
	#[prop(into)] stats: Signal<Option<StatsResponse>>,
	/// `max_flow` of the latest graph snapshot.
	#[prop(into)]
	graph_max_flow: Signal<Option<f64>>,
) -> impl IntoView {
	let field = move |f: fn(&StatsResponse) -> String| {
		move || {
			stats.with(|s| s.as_ref().map(f).unwrap_or_else(|| "-".into()))
		}
	};
	let max_flow = move || {
		let from_stats = stats.with(|s| s.as_ref().and_then(|s| s.max_flow));
		format_max_flow(resolve_max_flow(from_stats, graph_max_flow.get()))
	};
	let badge = move || {
		let status = stats.with(|s| s.as_ref().map(|s| s.status).unwrap_or_default());
		let (class, text) = status_badge(status);
		view! { <span class=class></span>" "{text} }
	};
	view! {
		<section class="sfa-panel sfa-kpis">
			<div class="sfa-kpi">
				<span class="sfa-kpi-label">"Logs"</span>
				<span id="kpi-logs">{field(|s| s.total_logs.to_string())}</span>
			</div>
			<div class="sfa-kpi">
				<span class="sfa-kpi-label">"Active nodes"</span>
				<span id="kpi-nodes">{field(|s| s.active_nodes.to_string())}</span>
			</div>
			<div class="sfa-kpi">
				<span class="sfa-kpi-label">"Max flow"</span>
				<span id="kpi-flow">{max_flow}</span>
			</div>
			<div class="sfa-kpi">
				<span class="sfa-kpi-label">"Status"</span>
				<span id="kpi-status">{badge}</span>
			</div>
		</section>
	}
}
