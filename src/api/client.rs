use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use web_sys::AbortSignal;

use super::types::{AlertsResponse, LogsResponse, StatsResponse};
use crate::components::topology::GraphSnapshot;
use crate::error::FetchError;

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
	Ok(serde_json::from_str(body)?)
}

/// Thin JSON client for the monitor's REST endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base: String,
}

impl ApiClient {
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into();
		Self {
			base: base.trim_end_matches('/').to_string(),
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base, path.trim_start_matches('/'))
	}

	pub async fn get<T: DeserializeOwned>(
		&self,
		path: &str,
		signal: Option<&AbortSignal>,
	) -> Result<T, FetchError> {
		let result = Request::get(&self.url(path))
			.abort_signal(signal)
			.send()
			.await;
		let response = match result {
			Ok(response) => response,
			Err(_) if signal.is_some_and(|s| s.aborted()) => return Err(FetchError::Aborted),
			Err(err) => return Err(err.into()),
		};
		if !response.ok() {
			return Err(FetchError::Status(response.status()));
		}
		let body = response.text().await?;
		decode(&body)
	}

	pub async fn graph(&self, signal: Option<&AbortSignal>) -> Result<GraphSnapshot, FetchError> {
		self.get("/api/graph", signal).await
	}

	pub async fn stats(&self, signal: Option<&AbortSignal>) -> Result<StatsResponse, FetchError> {
		self.get("/api/stats", signal).await
	}

	pub async fn logs(&self, signal: Option<&AbortSignal>) -> Result<LogsResponse, FetchError> {
		self.get("/api/logs", signal).await
	}

	pub async fn alerts(&self, signal: Option<&AbortSignal>) -> Result<AlertsResponse, FetchError> {
		self.get("/api/alerts", signal).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn joins_paths() {
		let client = ApiClient::new("http://localhost:5000/");
		assert_eq!(client.url("/api/graph"), "http://localhost:5000/api/graph");
		assert_eq!(ApiClient::new("").url("api/logs"), "/api/logs");
	}

	#[test]
	fn decode_rejects_non_json() {
		let err = decode::<LogsResponse>("<html>502</html>").unwrap_err();
		assert!(matches!(err, FetchError::Decode(_)));
		let ok: LogsResponse = decode(r#"{"logs": ["a", "b"]}"#).unwrap();
		assert_eq!(ok.logs, vec!["a", "b"]);
	}
}
