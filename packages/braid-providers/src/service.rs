//! Calls to a downstream service's `/search` and `/feed` endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use braid_domain::{item::ResultItem, target::Target};

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
	#[serde(default)]
	timestamp: Option<f64>,
	#[serde(default)]
	icon_url: Option<String>,
	#[serde(default)]
	details: Value,
	#[serde(default)]
	url: Option<String>,
}

pub async fn search(target: &Target, query: &str, timeout: Duration) -> Result<Vec<ResultItem>> {
	let client = Client::builder().timeout(timeout).build()?;
	let res = client
		.get(format!("{}/search", target.endpoint.service_url))
		.headers(crate::auth_headers(
			target.endpoint.api_key.as_deref(),
			&target.endpoint.default_headers,
		)?)
		.query(&[
			("braidUserId", target.user_id.as_str()),
			("accountId", target.account_id.as_str()),
			("q", query),
		])
		.send()
		.await?;
	let body = crate::read_body(res).await?;

	parse_items(&body, "matches", target)
}

pub async fn feed(target: &Target, since_ms: i64, timeout: Duration) -> Result<Vec<ResultItem>> {
	let client = Client::builder().timeout(timeout).build()?;
	let since = since_ms.to_string();
	let res = client
		.get(format!("{}/feed", target.endpoint.service_url))
		.headers(crate::auth_headers(
			target.endpoint.api_key.as_deref(),
			&target.endpoint.default_headers,
		)?)
		.query(&[
			("braidUserId", target.user_id.as_str()),
			("accountId", target.account_id.as_str()),
			("since", since.as_str()),
		])
		.send()
		.await?;
	let body = crate::read_body(res).await?;

	parse_items(&body, "items", target)
}

/// Extracts the item array under `field` and stamps each item with the target's identity.
fn parse_items(body: &str, field: &str, target: &Target) -> Result<Vec<ResultItem>> {
	let mut json: Value = serde_json::from_str(body)?;

	if json.is_null() {
		return Err(Error::EmptyResponse);
	}

	let items = json.get_mut(field).map(Value::take).ok_or_else(|| Error::InvalidResponse {
		message: format!("Service response is missing {field} array."),
	})?;

	if !items.is_array() {
		return Err(Error::InvalidResponse {
			message: format!("Service response field {field} is not an array."),
		});
	}

	let items: Vec<WireItem> = serde_json::from_value(items)?;

	Ok(items
		.into_iter()
		.map(|item| ResultItem {
			provider_id: target.provider_id.clone(),
			service_id: target.service_id.clone(),
			timestamp: item.timestamp.map(|ts| ts as i64),
			icon_url: item.icon_url.unwrap_or_default(),
			details: item.details,
			url: item.url,
		})
		.collect())
}

#[cfg(test)]
mod tests {
	use braid_domain::target::ServiceEndpoint;

	use super::*;

	fn target() -> Target {
		Target {
			user_id: "u1".to_string(),
			account_id: "acct".to_string(),
			provider_id: "com.example".to_string(),
			service_id: "com.example.mail".to_string(),
			endpoint: ServiceEndpoint::default(),
		}
	}

	#[test]
	fn stamps_identity_onto_matches() {
		let body = r#"{"matches":[
			{"timestamp":1760000000000,"iconUrl":"https://x/icon.png","details":{"subject":"hi"},"url":"https://x/1"},
			{"iconUrl":"https://x/icon.png","details":null}
		]}"#;
		let items = parse_items(body, "matches", &target()).expect("parse failed");

		assert_eq!(items.len(), 2);
		assert_eq!(items[0].provider_id, "com.example");
		assert_eq!(items[0].service_id, "com.example.mail");
		assert_eq!(items[0].timestamp, Some(1_760_000_000_000));
		assert_eq!(items[0].details["subject"], "hi");
		assert_eq!(items[1].timestamp, None);
		assert_eq!(items[1].url, None);
	}

	#[test]
	fn rejects_missing_array() {
		let err = parse_items(r#"{"items":[]}"#, "matches", &target()).expect_err("should fail");

		assert!(matches!(err, Error::InvalidResponse { .. }), "Unexpected error: {err:?}");
	}

	#[test]
	fn null_body_counts_as_no_data() {
		let err = parse_items("null", "items", &target()).expect_err("should fail");

		assert_eq!(err.to_string(), "No data returned from service.");
	}
}
