mod alerts;
mod kpi;
mod logs;

pub use alerts::AlertsPanel;
pub use kpi::KpiPanel;
pub use logs::{LogBuffer, LogPanel};
