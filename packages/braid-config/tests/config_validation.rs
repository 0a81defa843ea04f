use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use braid_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("braid_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse test config.")
}

fn sample_with_aggregation(key: &str, value: i64) -> String {
	let mut value_doc: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let aggregation = value_doc
		.as_table_mut()
		.and_then(|root| root.get_mut("aggregation"))
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [aggregation].");

	aggregation.insert(key.to_string(), Value::Integer(value));

	toml::to_string(&value_doc).expect("Failed to render sample config.")
}

#[test]
fn sample_config_loads_and_normalizes() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML.to_string());
	let result = braid_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config should load.");
	let google = &cfg.providers[0];

	assert_eq!(google.api_key, None);
	assert_eq!(google.services[0].service_url, "http://127.0.0.1:9001/gmail");
	assert_eq!(cfg.providers[1].services.len(), 0);
	assert_eq!(cfg.aggregation.feed_lookback_hours, 24);
}

#[test]
fn aggregation_section_defaults_when_omitted() {
	let mut doc: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample.");

	doc.as_table_mut().expect("Sample config must be a table.").remove("aggregation");

	let cfg: Config =
		toml::from_str(&toml::to_string(&doc).expect("Failed to render sample config."))
			.expect("Failed to parse config without aggregation.");

	assert_eq!(cfg.aggregation.search_timeout_ms, 120_000);
	assert_eq!(cfg.aggregation.feed_timeout_ms, 30_000);
	assert!(braid_config::validate(&cfg).is_ok());
}

#[test]
fn search_timeout_must_be_positive() {
	let path = write_temp_config(sample_with_aggregation("search_timeout_ms", 0));
	let result = braid_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected search timeout validation error.");

	assert!(
		err.to_string().contains("aggregation.search_timeout_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn feed_lookback_must_be_positive() {
	let mut cfg = base_config();

	cfg.aggregation.feed_lookback_hours = 0;

	let err = braid_config::validate(&cfg).expect_err("Expected lookback validation error.");

	assert!(
		err.to_string().contains("aggregation.feed_lookback_hours must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn duplicate_provider_ids_are_rejected() {
	let mut cfg = base_config();
	let duplicate = cfg.providers[0].clone();

	cfg.providers.push(duplicate);

	let err = braid_config::validate(&cfg).expect_err("Expected duplicate provider error.");

	assert!(
		err.to_string().contains("is configured more than once"),
		"Unexpected error: {err}"
	);
}

#[test]
fn provider_needs_services_or_descriptor() {
	let mut cfg = base_config();

	cfg.providers[1].descriptor_url = None;

	let err = braid_config::validate(&cfg).expect_err("Expected provider source error.");

	assert!(
		err.to_string().contains("must list services or set descriptor_url"),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_headers_must_be_strings() {
	let mut cfg = base_config();

	cfg.providers[0].default_headers.insert("x-retries".to_string(), serde_json::json!(3));

	let err = braid_config::validate(&cfg).expect_err("Expected header validation error.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("braid_config_test_missing_file.toml");

	let err = braid_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
