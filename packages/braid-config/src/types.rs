use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub aggregation: Aggregation,
	#[serde(default)]
	pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Fan-out tuning. Timeouts apply to each downstream call on its own; a job has no aggregate
/// deadline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Aggregation {
	pub search_timeout_ms: u64,
	pub feed_timeout_ms: u64,
	/// Oldest point a feed request may reach back to, relative to now.
	pub feed_lookback_hours: u32,
	pub descriptor_timeout_ms: u64,
}
impl Default for Aggregation {
	fn default() -> Self {
		Self {
			search_timeout_ms: 120_000,
			feed_timeout_ms: 30_000,
			feed_lookback_hours: 24,
			descriptor_timeout_ms: 10_000,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub logo_square_url: String,
	#[serde(default)]
	pub auth_url: String,
	/// Sent as a bearer token to every service of this provider.
	pub api_key: Option<String>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	/// Fetched at startup when `services` is empty.
	pub descriptor_url: Option<String>,
	#[serde(default)]
	pub services: Vec<ServiceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub logo_square_url: String,
	pub service_url: String,
}
