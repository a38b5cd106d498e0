use super::model::{VisualEdge, VisualNode};

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub title: String,
	pub rows: Vec<(&'static str, String)>,
}

fn latency(value: Option<f64>) -> String {
	value
		.map(|v| format!("{v:.1} ms"))
		.unwrap_or_else(|| "-".into())
}

fn raw(value: Option<f64>) -> String {
	value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn number(value: Option<f64>, decimals: usize) -> String {
	value
		.map(|v| format!("{v:.decimals$}"))
		.unwrap_or_else(|| "-".into())
}

pub fn node_tooltip(node: &VisualNode) -> Tooltip {
	let r = &node.record;
	let mut rows = vec![
		("Avg latency", latency(r.avg_latency)),
		("Load", raw(r.load)),
		("Status", r.status.as_str().to_string()),
	];
	if let Some(score) = r.bottleneck_score {
		rows.push(("Bottleneck score", format!("{score:.2}")));
	}
	Tooltip {
		title: r.display_label().to_string(),
		rows,
	}
}

pub fn edge_tooltip(edge: &VisualEdge) -> Tooltip {
	let r = &edge.record;
	Tooltip {
		title: format!("{} → {}", r.source, r.target),
		rows: vec![
			("Avg latency", latency(r.avg_latency)),
			("Last latency", latency(r.latency)),
			("Capacity", number(r.capacity, 4)),
			("Bottleneck", if edge.bottleneck { "yes" } else { "no" }.into()),
		],
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::types::{EdgeRecord, NodeRecord, NodeStatus};

	#[test]
	fn node_rows_round_and_fall_back() {
		let mut record = NodeRecord::new("billing");
		record.load = Some(37.5);
		record.status = NodeStatus::Warning;
		record.avg_latency = Some(81.349);
		let tip = node_tooltip(&VisualNode {
			record,
			position: None,
			pinned: false,
		});
		assert_eq!(tip.title, "billing");
		assert_eq!(tip.rows[0], ("Avg latency", "81.3 ms".to_string()));
		assert_eq!(tip.rows[1], ("Load", "37.5".to_string()));
		assert_eq!(tip.rows[2], ("Status", "warning".to_string()));
		assert_eq!(tip.rows.len(), 3);
	}

	#[test]
	fn edge_rows_with_missing_numbers() {
		let tip = edge_tooltip(&VisualEdge {
			record: EdgeRecord::new("api", "db"),
			bottleneck: true,
		});
		assert_eq!(tip.title, "api → db");
		assert_eq!(tip.rows[0].1, "-");
		assert_eq!(tip.rows[2].1, "-");
		assert_eq!(tip.rows[3].1, "yes");
	}

	#[test]
	fn node_label_and_score() {
		let mut record = NodeRecord::new("n1");
		record.label = Some("gateway".into());
		record.bottleneck_score = Some(0.5);
		let tip = node_tooltip(&VisualNode {
			record,
			position: None,
			pinned: false,
		});
		assert_eq!(tip.title, "gateway");
		assert_eq!(tip.rows[1], ("Load", "-".to_string()));
		assert_eq!(tip.rows[3], ("Bottleneck score", "0.50".to_string()));
	}
}
