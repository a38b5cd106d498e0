use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::model::{Position, VisualGraphModel};
use super::surface::{LayoutError, LayoutOptions};
use super::viewport::{MAX_ZOOM, MIN_ZOOM, ViewportState};

const RING_RADIUS: f64 = 100.0;
const NEIGHBOR_OFFSET: f64 = 40.0;
const FIT_PADDING: f64 = 40.0;
const STEP_DT: f32 = 0.016;
const WARMUP_STEPS: u32 = 60;
/// ~600ms at 60fps.
const ANIMATION_FRAMES: u32 = 36;

#[derive(Clone, Debug, Default)]
pub struct LayoutNode {
	pub id: String,
}

struct Simulation {
	graph: ForceGraph<LayoutNode, ()>,
	frames_left: u32,
}

/// Force-directed placement. Each pass builds a fresh simulation from the
/// model; nothing but positions is ever written back.
#[derive(Default)]
pub struct ForceLayout {
	sim: Option<Simulation>,
	passes: usize,
}

impl ForceLayout {
	pub fn new() -> Self {
		Self::default()
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.sim.is_some()
	}

	#[cfg(test)]
	pub fn passes(&self) -> usize {
		self.passes
	}

	/// Seeds positions, runs a warm-up, and either settles synchronously or
	/// leaves the simulation running for [`step`](Self::step) to animate.
	pub fn start(
		&mut self,
		model: &mut VisualGraphModel,
		options: LayoutOptions,
		width: f64,
		height: f64,
	) -> Result<Option<ViewportState>, LayoutError> {
		if !(width > 0.0 && height > 0.0) {
			return Err(LayoutError::ZeroSizedSurface { width, height });
		}
		self.passes += 1;

		let anchors: Vec<String> = if options.randomize {
			seed_ring(model, self.passes);
			Vec::new()
		} else {
			let anchored = model
				.nodes()
				.filter(|n| n.position.is_some())
				.map(|n| n.record.id.clone())
				.collect();
			seed_beside_neighbors(model);
			anchored
		};

		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx: HashMap<String, DefaultNodeIdx> = HashMap::new();
		for node in model.nodes() {
			let Some(pos) = node.position else {
				continue;
			};
			let id = node.record.id.clone();
			let is_anchor = (node.pinned && !options.randomize) || anchors.contains(&id);
			let idx = graph.add_node(NodeData {
				x: pos.x as f32,
				y: pos.y as f32,
				mass: 10.0,
				is_anchor,
				user_data: LayoutNode { id: id.clone() },
			});
			id_to_idx.insert(id, idx);
		}
		// self-loops exert no force and the simulation cannot hold them
		for edge in model.edges().filter(|e| e.record.source != e.record.target) {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(&edge.record.source),
				id_to_idx.get(&edge.record.target),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		let mut sim = Simulation {
			graph,
			frames_left: ANIMATION_FRAMES,
		};
		let steps = if options.animate {
			WARMUP_STEPS
		} else {
			WARMUP_STEPS + ANIMATION_FRAMES
		};
		for _ in 0..steps {
			sim.graph.update(STEP_DT);
		}
		write_back(&sim.graph, model);
		debug!(
			"layout pass {} seeded {} nodes ({} anchors)",
			self.passes,
			id_to_idx.len(),
			anchors.len()
		);

		self.sim = options.animate.then_some(sim);
		Ok(options.fit.then(|| fit(model, width, height)))
	}

	/// Advances a running animation by one frame. Returns true while running.
	pub fn step(&mut self, model: &mut VisualGraphModel, dt: f32) -> bool {
		let Some(sim) = self.sim.as_mut() else {
			return false;
		};
		sim.graph.update(dt);
		write_back(&sim.graph, model);
		sim.frames_left = sim.frames_left.saturating_sub(1);
		if sim.frames_left == 0 {
			self.sim = None;
		}
		self.sim.is_some()
	}

	/// Anchors a dragged node inside a running simulation.
	pub fn pin(&mut self, id: &str, pos: Position) {
		if let Some(sim) = self.sim.as_mut() {
			sim.graph.visit_nodes_mut(|node| {
				if node.data.user_data.id == id {
					node.data.x = pos.x as f32;
					node.data.y = pos.y as f32;
					node.data.is_anchor = true;
				}
			});
		}
	}

	pub fn stop(&mut self) {
		self.sim = None;
	}
}

fn write_back(graph: &ForceGraph<LayoutNode, ()>, model: &mut VisualGraphModel) {
	graph.visit_nodes(|node| {
		model.set_position(
			&node.data.user_data.id,
			Position::new(node.x() as f64, node.y() as f64),
		);
	});
}

/// Camera that frames every positioned node with some padding.
pub fn fit(model: &VisualGraphModel, width: f64, height: f64) -> ViewportState {
	let Some(bounds) = model.bounds() else {
		return ViewportState::centered(width, height);
	};
	let (avail_w, avail_h) = (
		(width - 2.0 * FIT_PADDING).max(1.0),
		(height - 2.0 * FIT_PADDING).max(1.0),
	);
	let zoom = match (bounds.width() > 0.0, bounds.height() > 0.0) {
		(false, false) => 1.0,
		(true, false) => avail_w / bounds.width(),
		(false, true) => avail_h / bounds.height(),
		(true, true) => (avail_w / bounds.width()).min(avail_h / bounds.height()),
	}
	.clamp(MIN_ZOOM, MAX_ZOOM);
	let center = bounds.center();
	ViewportState::new(
		zoom,
		width / 2.0 - center.x * zoom,
		height / 2.0 - center.y * zoom,
	)
}

/// Deterministic pseudo-random value in `[0, 1)`.
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed % 233280 + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn id_seed(id: &str) -> usize {
	id.bytes()
		.fold(17usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize))
}

fn ring_position(i: usize, n: usize, jitter_seed: usize) -> Position {
	let radius = RING_RADIUS * (n as f64).sqrt().max(1.0);
	let angle = (i as f64) * 2.0 * PI / n.max(1) as f64;
	let jitter = 0.8 + 0.4 * rand_simple(jitter_seed);
	Position::new(
		radius * jitter * angle.cos(),
		radius * jitter * angle.sin(),
	)
}

fn seed_ring(model: &mut VisualGraphModel, pass: usize) {
	let ids = model.node_ids();
	let n = ids.len();
	for (i, id) in ids.iter().enumerate() {
		let seed = id_seed(id).wrapping_add(pass.wrapping_mul(7919));
		model.set_position(id, ring_position(i, n, seed));
	}
}

/// Places each unpositioned node next to its positioned neighbours, or next
/// to the centroid of the drawing when it has none.
fn seed_beside_neighbors(model: &mut VisualGraphModel) {
	let pending = model.unpositioned_ids();
	if pending.is_empty() {
		return;
	}
	let centroid = model.bounds().map(|b| b.center());
	let total = model.node_count();
	for (i, id) in pending.iter().enumerate() {
		let anchors: Vec<Position> = model
			.neighbors(id)
			.iter()
			.filter_map(|n| model.position(n))
			.collect();
		let seed = id_seed(id);
		let angle = rand_simple(seed) * 2.0 * PI;
		let pos = if !anchors.is_empty() {
			let (sx, sy) = anchors
				.iter()
				.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
			let k = anchors.len() as f64;
			Position::new(
				sx / k + NEIGHBOR_OFFSET * angle.cos(),
				sy / k + NEIGHBOR_OFFSET * angle.sin(),
			)
		} else if let Some(c) = centroid {
			Position::new(
				c.x + RING_RADIUS * angle.cos(),
				c.y + RING_RADIUS * angle.sin(),
			)
		} else {
			ring_position(i, total, seed)
		};
		model.set_position(id, pos);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::types::{EdgeRecord, NodeRecord};

	fn chain(ids: &[&str]) -> VisualGraphModel {
		let mut model = VisualGraphModel::new();
		for id in ids {
			model.insert_node(NodeRecord::new(*id));
		}
		for pair in ids.windows(2) {
			model
				.insert_edge(EdgeRecord::new(pair[0], pair[1]), false)
				.unwrap();
		}
		model
	}

	#[test]
	fn initial_pass_places_every_node() {
		let mut model = chain(&["a", "b", "c", "d"]);
		let mut layout = ForceLayout::new();
		let fitted = layout
			.start(&mut model, LayoutOptions::initial(), 800.0, 600.0)
			.unwrap();
		assert!(model.unpositioned_ids().is_empty());
		assert!(fitted.is_some());
		assert!(layout.is_running());
	}

	#[test]
	fn incremental_pass_keeps_anchors() {
		let mut model = chain(&["a", "b"]);
		model.set_position("a", Position::new(0.0, 0.0));
		model.set_position("b", Position::new(50.0, 0.0));
		model.insert_node(NodeRecord::new("c"));
		model.insert_edge(EdgeRecord::new("b", "c"), false).unwrap();

		let mut layout = ForceLayout::new();
		let fitted = layout
			.start(&mut model, LayoutOptions::incremental(), 800.0, 600.0)
			.unwrap();
		assert!(fitted.is_none());
		while layout.step(&mut model, STEP_DT) {}

		assert_eq!(model.position("a"), Some(Position::new(0.0, 0.0)));
		assert_eq!(model.position("b"), Some(Position::new(50.0, 0.0)));
		assert!(model.position("c").is_some());
	}

	fn all_finite(model: &VisualGraphModel) -> bool {
		model
			.nodes()
			.all(|n| n.position.is_some_and(|p| p.x.is_finite() && p.y.is_finite()))
	}

	#[test]
	fn self_loop_edges_are_left_out_of_the_simulation() {
		let mut model = chain(&["a", "b"]);
		model.insert_edge(EdgeRecord::new("a", "a"), false).unwrap();
		let mut layout = ForceLayout::new();
		layout
			.start(&mut model, LayoutOptions::initial(), 800.0, 600.0)
			.unwrap();
		while layout.step(&mut model, STEP_DT) {}
		assert!(all_finite(&model));

		model.insert_node(NodeRecord::new("c"));
		model.insert_edge(EdgeRecord::new("c", "c"), false).unwrap();
		model.insert_edge(EdgeRecord::new("b", "c"), false).unwrap();
		layout
			.start(&mut model, LayoutOptions::incremental(), 800.0, 600.0)
			.unwrap();
		while layout.step(&mut model, STEP_DT) {}
		assert!(all_finite(&model));
		assert_eq!(model.edge_count(), 4);
	}

	#[test]
	fn zero_sized_surface_is_an_error() {
		let mut model = chain(&["a"]);
		let mut layout = ForceLayout::new();
		let err = layout
			.start(&mut model, LayoutOptions::initial(), 0.0, 600.0)
			.unwrap_err();
		assert!(matches!(err, LayoutError::ZeroSizedSurface { .. }));
		assert_eq!(layout.passes(), 0);
	}

	#[test]
	fn fit_frames_bounds() {
		let mut model = chain(&["a", "b"]);
		model.set_position("a", Position::new(-100.0, 0.0));
		model.set_position("b", Position::new(100.0, 0.0));
		let vp = fit(&model, 440.0, 300.0);
		assert!((vp.zoom - 1.8).abs() < 1e-9);
		let (sx, sy) = vp.graph_to_screen(Position::new(0.0, 0.0));
		assert!((sx - 220.0).abs() < 1e-9);
		assert!((sy - 150.0).abs() < 1e-9);
	}

	#[test]
	fn fit_of_empty_model_centers_origin() {
		let vp = fit(&VisualGraphModel::new(), 800.0, 600.0);
		assert_eq!(vp, ViewportState::centered(800.0, 600.0));
	}
}
