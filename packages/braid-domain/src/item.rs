use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One search match or feed entry returned by a downstream service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
	pub provider_id: String,
	pub service_id: String,
	/// Milliseconds since the Unix epoch.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<i64>,
	#[serde(default)]
	pub icon_url: String,
	#[serde(default)]
	pub details: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}
