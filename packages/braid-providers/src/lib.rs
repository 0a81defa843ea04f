pub mod descriptor;
pub mod service;

mod error;

pub use error::{Error, Result};

use reqwest::{
	Response,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

/// Builds request headers for a provider. The bearer token is only sent when a key is configured.
pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Reads a response body, failing on non-2xx statuses and empty bodies.
pub(crate) async fn read_body(res: Response) -> Result<String> {
	let status = res.status();
	let body = res.text().await?;

	if !status.is_success() {
		return Err(Error::Status { status: status.as_u16(), body: body.trim().to_string() });
	}
	if body.trim().is_empty() {
		return Err(Error::EmptyResponse);
	}

	Ok(body)
}
