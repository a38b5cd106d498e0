//! REST transport for the monitor backend.

mod client;
pub mod poll;
pub mod types;

pub use client::{ApiClient, decode};
pub use types::{Alert, AlertsResponse, LogsResponse, StatsResponse};
