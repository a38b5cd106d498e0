use leptos::prelude::*;

use crate::api::poll::poll_endpoint;
use crate::api::{Alert, ApiClient, StatsResponse};
use crate::components::panels::{AlertsPanel, KpiPanel, LogBuffer, LogPanel};
use crate::components::topology::{GraphSnapshot, TopologyCanvas};
use crate::config::DashboardConfig;

/// Live dashboard: topology canvas plus KPI, alert and log panels, each fed
/// by its own poll.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<DashboardConfig>().unwrap_or_default();
	let client = ApiClient::new(config.api_base.clone());

	let (snapshot, set_snapshot) = signal(None::<GraphSnapshot>);
	let (stats, set_stats) = signal(None::<StatsResponse>);
	let (alerts, set_alerts) = signal(Vec::<Alert>::new());
	let logs = RwSignal::new(LogBuffer::new(config.log_capacity));
	let graph_max_flow =
		Memo::new(move |_| snapshot.with(|s| s.as_ref().and_then(|s| s.max_flow)));

	poll_endpoint(
		"graph",
		config.graph_interval(),
		&client,
		|c, signal| async move { c.graph(signal.as_ref()).await },
		move |snap| set_snapshot.set(Some(snap)),
	);
	poll_endpoint(
		"stats",
		config.stats_interval(),
		&client,
		|c, signal| async move { c.stats(signal.as_ref()).await },
		move |s| set_stats.set(Some(s)),
	);
	poll_endpoint(
		"logs",
		config.logs_interval(),
		&client,
		|c, signal| async move { c.logs(signal.as_ref()).await },
		move |batch| logs.update(|buffer| buffer.extend(batch.logs)),
	);
	poll_endpoint(
		"alerts",
		config.alerts_interval(),
		&client,
		|c, signal| async move { c.alerts(signal.as_ref()).await },
		move |a| set_alerts.set(a.alerts),
	);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="sfa-dashboard">
				<header class="sfa-header">
					<h1>"Service Flow Analyzer"</h1>
					<KpiPanel stats=stats graph_max_flow=graph_max_flow />
				</header>
				<main class="sfa-main">
					<div id="graphContainer" class="sfa-graph">
						<TopologyCanvas snapshot=snapshot />
					</div>
					<aside class="sfa-side">
						<AlertsPanel alerts=alerts />
						<LogPanel buffer=logs />
					</aside>
				</main>
			</div>
		</ErrorBoundary>
	}
}
