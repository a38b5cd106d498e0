use std::collections::HashSet;

use super::model::Position;
use super::session::{ApplyOutcome, GraphSession};
use super::style::{HIT_SLACK, edge_width, node_radius};
use super::surface::{CanvasSurface, RenderSurface};
use super::tooltip::{Tooltip, edge_tooltip, node_tooltip};
use super::types::GraphSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverTarget {
	Node(String),
	Edge(String),
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub pan_start_x: f64,
	pub pan_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub target: Option<HoverTarget>,
	pub neighbors: HashSet<String>,
	pub highlight_t: f64,
	pub prev_target: Option<HoverTarget>,
	pub prev_neighbors: HashSet<String>,
	pub pointer: (f64, f64),
	delay_t: f64,
}

/// Everything one topology canvas needs between frames.
pub struct TopologyView {
	pub session: GraphSession<CanvasSurface>,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub flow_time: f64,
}

impl TopologyView {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			session: GraphSession::new(CanvasSurface::new(width, height)),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			flow_time: 0.0,
		}
	}

	pub fn surface(&self) -> &CanvasSurface {
		&self.session.surface
	}

	pub fn apply_snapshot(&mut self, snapshot: &GraphSnapshot) -> ApplyOutcome {
		let outcome = self.session.apply_snapshot(snapshot);
		self.drop_vanished_hover();
		outcome
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let surface = self.surface();
		let g = surface.viewport().screen_to_graph(sx, sy);
		let mut found = None;
		for node in surface.model.nodes() {
			let Some(p) = node.position else {
				continue;
			};
			let (dx, dy) = (p.x - g.x, p.y - g.y);
			if (dx * dx + dy * dy).sqrt() < node_radius(node.record.load) + HIT_SLACK {
				found = Some(node.record.id.clone());
			}
		}
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let surface = self.surface();
		let vp = surface.viewport();
		let g = vp.screen_to_graph(sx, sy);
		let model = &surface.model;
		model
			.edges()
			.filter_map(|edge| {
				let a = model.position(&edge.record.source)?;
				let b = model.position(&edge.record.target)?;
				let d = distance_to_segment(g, a, b);
				(d < edge_width(edge.bottleneck) / vp.zoom + HIT_SLACK)
					.then(|| (d, edge.record.id.clone()))
			})
			.min_by(|x, y| x.0.total_cmp(&y.0))
			.map(|(_, id)| id)
	}

	pub fn set_hover(&mut self, target: Option<HoverTarget>) {
		if self.hover.target == target {
			return;
		}
		let was_hovering = self.hover.target.is_some();

		if was_hovering && target.is_none() {
			self.hover.prev_target = self.hover.target.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_target = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.neighbors.clear();
		match &target {
			Some(HoverTarget::Node(id)) => {
				self.hover.neighbors = self.surface().model.neighbors(id);
			}
			Some(HoverTarget::Edge(id)) => {
				if let Some(edge) = self.surface().model.edge(id) {
					self.hover.neighbors =
						HashSet::from([edge.record.source.clone(), edge.record.target.clone()]);
				}
			}
			None => {}
		}
		if target.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
		self.hover.target = target;
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		let is_node = |t: &Option<HoverTarget>| matches!(t, Some(HoverTarget::Node(n)) if n == id);
		is_node(&self.hover.target)
			|| self.hover.neighbors.contains(id)
			|| is_node(&self.hover.prev_target)
			|| self.hover.prev_neighbors.contains(id)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		let is_node = |t: &Option<HoverTarget>| matches!(t, Some(HoverTarget::Node(n)) if n == id);
		is_node(&self.hover.target) || is_node(&self.hover.prev_target)
	}

	pub fn is_edge_hovered(&self, id: &str) -> bool {
		matches!(&self.hover.target, Some(HoverTarget::Edge(e)) if e == id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.target.is_some() || self.hover.prev_target.is_some()
	}

	pub fn tooltip(&self) -> Option<Tooltip> {
		let model = &self.surface().model;
		match self.hover.target.as_ref()? {
			HoverTarget::Node(id) => model.node(id).map(node_tooltip),
			HoverTarget::Edge(id) => model.edge(id).map(edge_tooltip),
		}
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(id) = self.node_at_position(x, y) {
			let start = self.surface().model.position(&id).unwrap_or_default();
			self.drag = DragState {
				active: true,
				node_id: Some(id),
				start_x: x,
				start_y: y,
				node_start: start,
			};
		} else {
			let vp = self.surface().viewport();
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				pan_start_x: vp.pan.x,
				pan_start_y: vp.pan.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.hover.pointer = (x, y);
		if !self.drag.active {
			let target = self
				.node_at_position(x, y)
				.map(HoverTarget::Node)
				.or_else(|| self.edge_at_position(x, y).map(HoverTarget::Edge));
			self.set_hover(target);
		}

		if self.drag.active {
			if let Some(id) = self.drag.node_id.clone() {
				let zoom = self.surface().viewport().zoom;
				let pos = Position::new(
					self.drag.node_start.x + (x - self.drag.start_x) / zoom,
					self.drag.node_start.y + (y - self.drag.start_y) / zoom,
				);
				let surface = &mut self.session.surface;
				surface.model.pin(&id, pos);
				surface.layout.pin(&id, pos);
			}
		} else if self.pan.active {
			let vp = self.surface().viewport();
			let moved = vp.panned_by(
				self.pan.pan_start_x + (x - self.pan.start_x) - vp.pan.x,
				self.pan.pan_start_y + (y - self.pan.start_y) - vp.pan.y,
			);
			self.session.operator_viewport(moved);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		let zoomed = self.surface().viewport().zoom_at(x, y, delta_y);
		self.session.operator_viewport(zoomed);
	}

	pub fn tick(&mut self, dt: f32) {
		self.session.surface.tick_layout(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.target.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.target.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_target = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.session.surface.resize(width, height);
	}

	fn drop_vanished_hover(&mut self) {
		let model = &self.session.surface.model;
		let alive = |t: &Option<HoverTarget>| match t {
			Some(HoverTarget::Node(id)) => model.node(id).is_some(),
			Some(HoverTarget::Edge(id)) => model.edge(id).is_some(),
			None => true,
		};
		if !alive(&self.hover.target) {
			self.hover.target = None;
			self.hover.neighbors.clear();
		}
		if !alive(&self.hover.prev_target) {
			self.hover.prev_target = None;
			self.hover.prev_neighbors.clear();
		}
	}
}

fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < 1e-9 {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx, a.y + t * dy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
