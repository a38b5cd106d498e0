use serde::Deserialize;

use crate::components::topology::NodeStatus;
use crate::components::topology::types::lenient_number;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StatsResponse {
	#[serde(default)]
	pub total_logs: u64,
	#[serde(default)]
	pub active_nodes: u64,
	#[serde(default)]
	pub status: NodeStatus,
	#[serde(default, deserialize_with = "lenient_number")]
	pub max_flow: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LogsResponse {
	#[serde(default)]
	pub logs: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Alert {
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub route: String,
	#[serde(default)]
	pub meta: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AlertsResponse {
	#[serde(default)]
	pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stats_accept_ok_status() {
		let stats: StatsResponse =
			serde_json::from_str(r#"{"total_logs": 420, "active_nodes": 7, "status": "ok"}"#)
				.unwrap();
		assert_eq!(stats.status, NodeStatus::Normal);
		assert_eq!(stats.max_flow, None);
	}

	#[test]
	fn alert_type_field() {
		let alerts: AlertsResponse = serde_json::from_str(
			r#"{"alerts": [{"type": "critical", "title": "Latency critical",
			"message": "api → db avg=151.0, trend=+0.4", "route": "api/db", "meta": ""}]}"#,
		)
		.unwrap();
		assert_eq!(alerts.alerts[0].kind, "critical");
		assert_eq!(alerts.alerts[0].route, "api/db");
	}
}
