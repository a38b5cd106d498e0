//! Wire shapes for `GET /api/graph`.

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Health of a node as reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
	#[serde(alias = "ok")]
	Normal,
	Warning,
	Critical,
	#[default]
	#[serde(other)]
	Unknown,
}

impl NodeStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			NodeStatus::Normal => "normal",
			NodeStatus::Warning => "warning",
			NodeStatus::Critical => "critical",
			NodeStatus::Unknown => "unknown",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRecord {
	pub id: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub load: Option<f64>,
	#[serde(default)]
	pub status: NodeStatus,
	#[serde(default, deserialize_with = "lenient_number")]
	pub avg_latency: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub bottleneck_score: Option<f64>,
}

impl NodeRecord {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: None,
			load: None,
			status: NodeStatus::Normal,
			avg_latency: None,
			bottleneck_score: None,
		}
	}

	/// Display label, falling back to the id.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EdgeRecord {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default, deserialize_with = "lenient_number")]
	pub capacity: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub avg_latency: Option<f64>,
	/// Last observed latency of the flow.
	#[serde(default, deserialize_with = "lenient_number")]
	pub latency: Option<f64>,
	#[serde(default)]
	pub is_bottleneck: Option<bool>,
}

impl EdgeRecord {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		let (source, target) = (source.into(), target.into());
		Self {
			id: format!("{source}->{target}"),
			source,
			target,
			capacity: None,
			avg_latency: None,
			latency: None,
			is_bottleneck: None,
		}
	}
}

/// One poll of the topology. Transient: consumed by reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSnapshot {
	#[serde(default)]
	pub nodes: Vec<NodeRecord>,
	#[serde(default)]
	pub edges: Vec<EdgeRecord>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub max_flow: Option<f64>,
	/// Edge ids the server placed in a min-cut.
	#[serde(default)]
	pub bottlenecks: Vec<String>,
}

impl GraphSnapshot {
	pub fn is_bottleneck(&self, edge: &EdgeRecord) -> bool {
		edge.is_bottleneck == Some(true) || self.bottlenecks.iter().any(|id| *id == edge.id)
	}
}

/// Numbers become `Some`, everything else (null, strings, ...) becomes `None`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	Ok(match value {
		Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
		Value::Null => None,
		other => {
			warn!("ignoring non-numeric value {other}");
			None
		}
	})
}
