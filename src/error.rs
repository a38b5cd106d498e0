use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("request failed: {0}")]
	Transport(String),
	#[error("server answered {0}")]
	Status(u16),
	#[error("response is not valid JSON for this endpoint: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("request aborted by a newer poll")]
	Aborted,
}

impl From<gloo_net::Error> for FetchError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(err) => FetchError::Decode(err),
			other => FetchError::Transport(other.to_string()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("unknown setting `{0}`")]
	UnknownKey(String),
	#[error("setting `{key}` expects {expected}, got `{value}`")]
	InvalidValue {
		key: String,
		value: String,
		expected: &'static str,
	},
}
