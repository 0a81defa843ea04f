pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("Status code: {status}{}", body_suffix(.body))]
	Status { status: u16, body: String },
	#[error("No data returned from service.")]
	EmptyResponse,
	#[error("{message}")]
	InvalidResponse { message: String },
}

fn body_suffix(body: &str) -> String {
	if body.is_empty() { String::new() } else { format!(". {body}") }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_message_includes_body_when_present() {
		let bare = Error::Status { status: 502, body: String::new() };
		let with_body = Error::Status { status: 401, body: "token expired".to_string() };

		assert_eq!(bare.to_string(), "Status code: 502");
		assert_eq!(with_body.to_string(), "Status code: 401. token expired");
	}
}
