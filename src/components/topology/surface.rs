//! The capability the reconciler and scheduler drive. Everything that mutates
//! the drawn graph, runs layout, or moves the camera goes through
//! [`RenderSurface`], so both can be exercised without a canvas.

use thiserror::Error;

use super::layout::ForceLayout;
use super::model::{DanglingEndpoint, VisualGraphModel};
use super::types::{EdgeRecord, NodeRecord};
use super::viewport::ViewportState;

/// Knobs passed to the layout capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
	pub randomize: bool,
	pub animate: bool,
	pub fit: bool,
}

impl LayoutOptions {
	/// First pass: scatter everything and frame it.
	pub fn initial() -> Self {
		Self {
			randomize: true,
			animate: true,
			fit: true,
		}
	}

	/// Later passes: existing nodes stay put and the camera is left alone.
	pub fn incremental() -> Self {
		Self {
			randomize: false,
			animate: true,
			fit: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
	#[error("cannot lay out on a {width}x{height} surface")]
	ZeroSizedSurface { width: f64, height: f64 },
}

pub trait RenderSurface {
	fn model(&self) -> &VisualGraphModel;

	fn model_mut(&mut self) -> &mut VisualGraphModel;

	fn run_layout(&mut self, options: LayoutOptions) -> Result<(), LayoutError>;

	fn viewport(&self) -> ViewportState;

	fn set_viewport(&mut self, viewport: ViewportState);

	fn node_ids(&self) -> Vec<String> {
		self.model().node_ids()
	}

	fn edge_ids(&self) -> Vec<String> {
		self.model().edge_ids()
	}

	fn add_node(&mut self, record: NodeRecord) {
		self.model_mut().insert_node(record);
	}

	fn add_edge(&mut self, record: EdgeRecord, bottleneck: bool) -> Result<(), DanglingEndpoint> {
		self.model_mut().insert_edge(record, bottleneck)
	}

	fn update_node_data(&mut self, record: NodeRecord) -> bool {
		self.model_mut().update_node_data(record)
	}

	fn update_edge_data(
		&mut self,
		record: EdgeRecord,
		bottleneck: bool,
	) -> Result<bool, DanglingEndpoint> {
		self.model_mut().update_edge_data(record, bottleneck)
	}

	/// Removes the node and its incident edges; returns the removed edge ids.
	fn remove_node(&mut self, id: &str) -> Vec<String> {
		self.model_mut().remove_node(id).unwrap_or_default()
	}

	fn remove_edge(&mut self, id: &str) -> bool {
		self.model_mut().remove_edge(id)
	}
}

/// The surface behind the `<canvas>`: model, force layout, and camera.
pub struct CanvasSurface {
	pub model: VisualGraphModel,
	pub layout: ForceLayout,
	viewport: ViewportState,
	pub width: f64,
	pub height: f64,
}

impl CanvasSurface {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			model: VisualGraphModel::new(),
			layout: ForceLayout::new(),
			viewport: ViewportState::centered(width, height),
			width,
			height,
		}
	}

	/// Advances the layout animation; true while it is still running.
	pub fn tick_layout(&mut self, dt: f32) -> bool {
		self.layout.step(&mut self.model, dt)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl RenderSurface for CanvasSurface {
	fn model(&self) -> &VisualGraphModel {
		&self.model
	}

	fn model_mut(&mut self) -> &mut VisualGraphModel {
		&mut self.model
	}

	fn run_layout(&mut self, options: LayoutOptions) -> Result<(), LayoutError> {
		let fitted = self
			.layout
			.start(&mut self.model, options, self.width, self.height)?;
		if let Some(viewport) = fitted {
			self.viewport = viewport;
		}
		Ok(())
	}

	fn viewport(&self) -> ViewportState {
		self.viewport
	}

	fn set_viewport(&mut self, viewport: ViewportState) {
		self.viewport = viewport;
	}
}

/// Surface double that records what the engine asked of it.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSurface {
	pub model: VisualGraphModel,
	pub layouts: Vec<LayoutOptions>,
	pub viewport_writes: Vec<ViewportState>,
	pub viewport: ViewportState,
	/// Camera a `fit` layout lands on.
	pub fit_to: ViewportState,
	pub fail_layout: bool,
}

#[cfg(test)]
impl RenderSurface for RecordingSurface {
	fn model(&self) -> &VisualGraphModel {
		&self.model
	}

	fn model_mut(&mut self) -> &mut VisualGraphModel {
		&mut self.model
	}

	fn run_layout(&mut self, options: LayoutOptions) -> Result<(), LayoutError> {
		if self.fail_layout {
			return Err(LayoutError::ZeroSizedSurface {
				width: 0.0,
				height: 0.0,
			});
		}
		self.layouts.push(options);
		for id in self.model.unpositioned_ids() {
			self.model
				.set_position(&id, super::model::Position::new(1.0, 1.0));
		}
		if options.fit {
			self.viewport = self.fit_to;
		}
		Ok(())
	}

	fn viewport(&self) -> ViewportState {
		self.viewport
	}

	fn set_viewport(&mut self, viewport: ViewportState) {
		self.viewport_writes.push(viewport);
		self.viewport = viewport;
	}
}
