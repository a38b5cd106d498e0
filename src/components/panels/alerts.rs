use leptos::prelude::*;

use crate::api::Alert;

pub fn alert_meta_line(alert: &Alert) -> String {
	format!("{} • {}", alert.route, alert.meta)
}

/// Replaced wholesale on every successful poll.
#[component]
pub fn AlertsPanel(#[prop(into)] alerts: Signal<Vec<Alert>>) -> impl IntoView {
	let count = move || alerts.with(|a| a.len()).to_string();
	let rows = move || {
		alerts.with(|list| {
			list.iter()
				.map(|a| {
					let class = format!("sfa-alert sfa-alert-{}", a.kind);
					let meta = alert_meta_line(a);
					view! {
						<div class=class>
							<div class="sfa-alert-title">{a.title.clone()}</div>
							<div class="sfa-alert-msg">{a.message.clone()}</div>
							<div class="sfa-alert-meta">{meta}</div>
						</div>
					}
				})
				.collect_view()
		})
	};
	view! {
		<section class="sfa-panel sfa-alerts">
			<h2>"Alerts " <span id="alerts-count" class="sfa-badge">{count}</span></h2>
			<div id="alerts-list">{rows}</div>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn meta_line_joins_route_and_meta() {
		let alert = Alert {
			route: "api/db".into(),
			meta: "p95".into(),
			..Alert::default()
		};
		assert_eq!(alert_meta_line(&alert), "api/db • p95");
	}
}
