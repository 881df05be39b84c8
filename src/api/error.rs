use thiserror::Error;

/// Failure talking to the content API.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("server answered {status}: {message}")]
	Status { status: u16, message: String },

	#[error("could not decode response: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("invalid API base url `{0}`")]
	BaseUrl(String),
}

impl ApiError {
	/// Builds a status error from a non-success response body.
	///
	/// The server reports failures as `{"error": "..."}`; anything else is
	/// passed through as raw text.
	pub fn from_status(status: u16, body: &str) -> Self {
		let message = serde_json::from_str::<serde_json::Value>(body)
			.ok()
			.and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
			.unwrap_or_else(|| body.trim().to_owned());
		ApiError::Status { status, message }
	}
}
