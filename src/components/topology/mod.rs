mod component;
pub mod layout;
pub mod model;
pub mod reconcile;
mod render;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod style;
pub mod surface;
pub mod tooltip;
pub mod types;
pub mod viewport;

pub use component::TopologyCanvas;
pub use reconcile::{IntegrityWarning, ReconcileReport, reconcile};
pub use session::GraphSession;
pub use surface::{CanvasSurface, LayoutOptions, RenderSurface};
pub use types::{EdgeRecord, GraphSnapshot, NodeRecord, NodeStatus};
pub use viewport::{ViewportState, ViewportTracker};
