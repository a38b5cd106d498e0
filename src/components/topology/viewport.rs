use super::model::Position;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pan {
	pub x: f64,
	pub y: f64,
}

/// Camera: `screen = graph * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
	pub zoom: f64,
	pub pan: Pan,
}

impl Default for ViewportState {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan: Pan::default(),
		}
	}
}

impl ViewportState {
	pub fn new(zoom: f64, x: f64, y: f64) -> Self {
		Self {
			zoom,
			pan: Pan { x, y },
		}
	}

	/// Graph origin at the centre of a `width` x `height` surface.
	pub fn centered(width: f64, height: f64) -> Self {
		Self::new(1.0, width / 2.0, height / 2.0)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new((sx - self.pan.x) / self.zoom, (sy - self.pan.y) / self.zoom)
	}

	pub fn graph_to_screen(&self, p: Position) -> (f64, f64) {
		(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
	}

	/// Wheel zoom about the cursor. Positive `delta_y` zooms out.
	pub fn zoom_at(&self, sx: f64, sy: f64, delta_y: f64) -> Self {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = zoom / self.zoom;
		Self {
			zoom,
			pan: Pan {
				x: sx - (sx - self.pan.x) * ratio,
				y: sy - (sy - self.pan.y) * ratio,
			},
		}
	}

	pub fn panned_by(&self, dx: f64, dy: f64) -> Self {
		Self {
			zoom: self.zoom,
			pan: Pan {
				x: self.pan.x + dx,
				y: self.pan.y + dy,
			},
		}
	}
}

/// Who moved the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportCause {
	Operator,
	Programmatic,
}

/// Remembers the operator's framing so layout passes can hand it back.
///
/// Every change is observed, but only operator-driven ones (and explicit
/// [`capture`](Self::capture) calls) move the baseline that
/// [`restore`](Self::restore) returns.
#[derive(Clone, Debug, Default)]
pub struct ViewportTracker {
	current: ViewportState,
	baseline: ViewportState,
}

impl ViewportTracker {
	pub fn new(initial: ViewportState) -> Self {
		Self {
			current: initial,
			baseline: initial,
		}
	}

	pub fn observe(&mut self, state: ViewportState, cause: ViewportCause) {
		self.current = state;
		if cause == ViewportCause::Operator {
			self.baseline = state;
		}
	}

	pub fn capture(&mut self, state: ViewportState) {
		self.current = state;
		self.baseline = state;
	}

	pub fn restore(&self) -> ViewportState {
		self.baseline
	}

	#[cfg(test)]
	pub fn current(&self) -> ViewportState {
		self.current
	}
}
