use serde_json::{Map, Value};

/// Where and how to call one downstream service.
#[derive(Clone, Debug, Default)]
pub struct ServiceEndpoint {
	pub service_url: String,
	pub api_key: Option<String>,
	pub default_headers: Map<String, Value>,
}

/// One (account, provider, service) triple eligible for a job.
#[derive(Clone, Debug)]
pub struct Target {
	pub user_id: String,
	pub account_id: String,
	pub provider_id: String,
	pub service_id: String,
	pub endpoint: ServiceEndpoint,
}
