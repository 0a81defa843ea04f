mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Aggregation, Config, Postgres, ProviderConfig, Service, ServiceConfig, Storage};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("aggregation.search_timeout_ms", cfg.aggregation.search_timeout_ms),
		("aggregation.feed_timeout_ms", cfg.aggregation.feed_timeout_ms),
		("aggregation.descriptor_timeout_ms", cfg.aggregation.descriptor_timeout_ms),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if cfg.aggregation.feed_lookback_hours == 0 {
		return Err(Error::Validation {
			message: "aggregation.feed_lookback_hours must be greater than zero.".to_string(),
		});
	}

	let mut provider_ids = HashSet::new();

	for provider in &cfg.providers {
		if provider.id.trim().is_empty() {
			return Err(Error::Validation { message: "providers.id must be non-empty.".to_string() });
		}
		if !provider_ids.insert(provider.id.as_str()) {
			return Err(Error::Validation {
				message: format!("Provider {} is configured more than once.", provider.id),
			});
		}
		if provider.services.is_empty() && provider.descriptor_url.is_none() {
			return Err(Error::Validation {
				message: format!(
					"Provider {} must list services or set descriptor_url.",
					provider.id
				),
			});
		}

		for (key, value) in &provider.default_headers {
			if !value.is_string() {
				return Err(Error::Validation {
					message: format!(
						"Provider {} default header {key} must be a string.",
						provider.id
					),
				});
			}
		}

		let mut service_ids = HashSet::new();

		for service in &provider.services {
			if service.id.trim().is_empty() {
				return Err(Error::Validation {
					message: format!("Provider {} has a service with an empty id.", provider.id),
				});
			}
			if !service_ids.insert(service.id.as_str()) {
				return Err(Error::Validation {
					message: format!(
						"Service {} is listed more than once under provider {}.",
						service.id, provider.id
					),
				});
			}
			if service.service_url.trim().is_empty() {
				return Err(Error::Validation {
					message: format!("Service {} service_url must be non-empty.", service.id),
				});
			}
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for provider in &mut cfg.providers {
		if provider.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
			provider.api_key = None;
		}
		if provider.descriptor_url.as_deref().map(|url| url.trim().is_empty()).unwrap_or(false) {
			provider.descriptor_url = None;
		}

		for service in &mut provider.services {
			let trimmed = service.service_url.trim().trim_end_matches('/').to_string();

			service.service_url = trimmed;
		}
	}
}
