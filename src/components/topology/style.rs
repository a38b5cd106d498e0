use super::types::NodeStatus;

pub const BACKGROUND: &str = "#1a1a2e";
pub const NODE_BORDER: &str = "#1A3D7A";
pub const EDGE_COLOR: (u8, u8, u8) = (136, 153, 204);
pub const BOTTLENECK_COLOR: (u8, u8, u8) = (255, 68, 68);

pub const MIN_RADIUS: f64 = 10.0;
pub const MAX_RADIUS: f64 = 30.0;
const MAX_LOAD: f64 = 200.0;

/// Extra world-space slack for pointer hits.
pub const HIT_SLACK: f64 = 4.0;

pub fn node_color(status: NodeStatus) -> &'static str {
	match status {
		NodeStatus::Normal => "#4C8BF5",
		NodeStatus::Warning => "#ffcc33",
		NodeStatus::Critical => "#ff4444",
		NodeStatus::Unknown => "#7f7f7f",
	}
}

/// Load 0..200 maps linearly to radius 10..30, clamped. No load draws
/// the smallest node.
pub fn node_radius(load: Option<f64>) -> f64 {
	let t = match load {
		Some(load) if load.is_finite() => (load / MAX_LOAD).clamp(0.0, 1.0),
		_ => 0.0,
	};
	MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * t
}

pub fn edge_width(bottleneck: bool) -> f64 {
	if bottleneck { 3.5 } else { 1.5 }
}

pub fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha})")
}
