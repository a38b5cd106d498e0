//! Dashboard settings: compiled-in defaults, overridable from the page URL
//! (`?api=http://host:5000&graph_ms=2000&log_cap=200`).

use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

use crate::error::ConfigError;

const MIN_INTERVAL_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
	/// Prefix for every `/api/...` request. Empty means same origin.
	pub api_base: String,
	pub graph_interval_ms: u64,
	pub stats_interval_ms: u64,
	pub logs_interval_ms: u64,
	pub alerts_interval_ms: u64,
	pub log_capacity: usize,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			graph_interval_ms: 1500,
			stats_interval_ms: 1000,
			logs_interval_ms: 1000,
			alerts_interval_ms: 1000,
			log_capacity: 100,
		}
	}
}

fn parse_interval(key: &str, value: &str) -> Result<u64, ConfigError> {
	match value.parse::<u64>() {
		Ok(ms) if ms > 0 => Ok(ms.max(MIN_INTERVAL_MS)),
		_ => Err(ConfigError::InvalidValue {
			key: key.to_string(),
			value: value.to_string(),
			expected: "a positive number of milliseconds",
		}),
	}
}

impl DashboardConfig {
	pub fn graph_interval(&self) -> Duration {
		Duration::from_millis(self.graph_interval_ms)
	}

	pub fn stats_interval(&self) -> Duration {
		Duration::from_millis(self.stats_interval_ms)
	}

	pub fn logs_interval(&self) -> Duration {
		Duration::from_millis(self.logs_interval_ms)
	}

	pub fn alerts_interval(&self) -> Duration {
		Duration::from_millis(self.alerts_interval_ms)
	}

	/// Applies one `key=value` override. On error nothing changes.
	pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
		match key {
			"api" => self.api_base = value.trim().to_string(),
			"graph_ms" => self.graph_interval_ms = parse_interval(key, value)?,
			"stats_ms" => self.stats_interval_ms = parse_interval(key, value)?,
			"logs_ms" => self.logs_interval_ms = parse_interval(key, value)?,
			"alerts_ms" => self.alerts_interval_ms = parse_interval(key, value)?,
			"log_cap" => {
				self.log_capacity = match value.parse::<usize>() {
					Ok(cap) if cap > 0 => cap,
					_ => {
						return Err(ConfigError::InvalidValue {
							key: key.to_string(),
							value: value.to_string(),
							expected: "a positive line count",
						});
					}
				}
			}
			_ => return Err(ConfigError::UnknownKey(key.to_string())),
		}
		Ok(())
	}

	pub fn with_overrides<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		for (key, value) in pairs {
			if let Err(err) = self.apply_override(key, value) {
				warn!("config: {err}, keeping default");
			}
		}
		self
	}

	/// Defaults plus whatever the current page's query string overrides.
	pub fn from_location() -> Self {
		const KEYS: [&str; 6] = ["api", "graph_ms", "stats_ms", "logs_ms", "alerts_ms", "log_cap"];
		let params = web_sys::window()
			.and_then(|w| w.location().search().ok())
			.and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
		let found: Vec<(&str, String)> = match &params {
			Some(params) => KEYS
				.iter()
				.filter_map(|key| params.get(key).map(|v| (*key, v)))
				.collect(),
			None => Vec::new(),
		};
		let config = Self::default().with_overrides(found.iter().map(|(k, v)| (*k, v.as_str())));
		info!("dashboard config: {config:?}");
		config
	}
}
