use std::time::Duration;

use serde_json::{Map, Value};

use braid_config::ProviderConfig;
use braid_domain::{
	account::LinkedAccount,
	descriptor::{ProviderDescriptor, ServiceDescriptor},
	target::{ServiceEndpoint, Target},
};
use braid_providers::descriptor;

use crate::{Error, Result};

/// A catalog provider together with the credentials used to call its services.
#[derive(Clone, Debug)]
pub struct CatalogProvider {
	pub descriptor: ProviderDescriptor,
	pub api_key: Option<String>,
	pub default_headers: Map<String, Value>,
}
impl CatalogProvider {
	pub fn endpoint(&self, service: &ServiceDescriptor) -> ServiceEndpoint {
		ServiceEndpoint {
			service_url: service.service_url.clone(),
			api_key: self.api_key.clone(),
			default_headers: self.default_headers.clone(),
		}
	}
}

/// Every provider and service the engine knows how to call. Built once at startup and shared.
#[derive(Clone, Debug, Default)]
pub struct ProviderCatalog {
	providers: Vec<CatalogProvider>,
}
impl ProviderCatalog {
	pub fn new(providers: Vec<CatalogProvider>) -> Self {
		Self { providers }
	}

	/// Builds the catalog from config, fetching descriptors for providers that list no services
	/// inline.
	pub async fn load(configs: &[ProviderConfig], descriptor_timeout: Duration) -> Result<Self> {
		let mut providers = Vec::with_capacity(configs.len());

		for cfg in configs {
			let descriptor = if cfg.services.is_empty()
				&& let Some(url) = cfg.descriptor_url.as_deref()
			{
				let fetched =
					descriptor::fetch_descriptor(url, descriptor_timeout).await.map_err(|err| {
						Error::Provider {
							message: format!(
								"Failed to fetch descriptor for provider {}: {err}",
								cfg.id
							),
						}
					})?;

				tracing::info!(
					provider_id = %cfg.id,
					services = fetched.services.len(),
					"Loaded provider descriptor."
				);

				merge_descriptor(cfg, fetched)
			} else {
				descriptor_from_config(cfg)
			};

			providers.push(CatalogProvider {
				descriptor,
				api_key: cfg.api_key.clone(),
				default_headers: cfg.default_headers.clone(),
			});
		}

		Ok(Self { providers })
	}

	pub fn providers(&self) -> &[CatalogProvider] {
		&self.providers
	}

	pub fn provider(&self, provider_id: &str) -> Option<&CatalogProvider> {
		self.providers.iter().find(|provider| provider.descriptor.id == provider_id)
	}

	/// Expands accounts into callable targets, one per service the provider offers and the
	/// account enabled. Unknown providers are skipped and repeated or retired service IDs on a
	/// profile are ignored.
	pub fn targets_for(&self, accounts: &[LinkedAccount]) -> Vec<Target> {
		let mut targets = Vec::new();

		for account in accounts {
			let Some(provider) = self.provider(&account.provider_id) else {
				tracing::debug!(
					provider_id = %account.provider_id,
					account_id = %account.account_id,
					"Skipping account for a provider missing from the catalog."
				);

				continue;
			};

			for service in &provider.descriptor.services {
				if !account.profile.service_ids.contains(&service.id) {
					continue;
				}

				targets.push(Target {
					user_id: account.user_id.clone(),
					account_id: account.account_id.clone(),
					provider_id: provider.descriptor.id.clone(),
					service_id: service.id.clone(),
					endpoint: provider.endpoint(service),
				});
			}
		}

		targets
	}
}

fn descriptor_from_config(cfg: &ProviderConfig) -> ProviderDescriptor {
	ProviderDescriptor {
		id: cfg.id.clone(),
		name: cfg.name.clone(),
		logo_square_url: cfg.logo_square_url.clone(),
		auth_url: cfg.auth_url.clone(),
		services: cfg
			.services
			.iter()
			.map(|service| ServiceDescriptor {
				id: service.id.clone(),
				name: service.name.clone(),
				logo_square_url: service.logo_square_url.clone(),
				service_url: service.service_url.clone(),
			})
			.collect(),
	}
}

/// Configured identity wins over what the descriptor endpoint reports.
fn merge_descriptor(cfg: &ProviderConfig, fetched: ProviderDescriptor) -> ProviderDescriptor {
	if fetched.id != cfg.id {
		tracing::warn!(
			provider_id = %cfg.id,
			descriptor_id = %fetched.id,
			"Provider descriptor reports a different ID. Using the configured one."
		);
	}

	ProviderDescriptor {
		id: cfg.id.clone(),
		name: if cfg.name.is_empty() { fetched.name } else { cfg.name.clone() },
		logo_square_url: if cfg.logo_square_url.is_empty() {
			fetched.logo_square_url
		} else {
			cfg.logo_square_url.clone()
		},
		auth_url: if cfg.auth_url.is_empty() { fetched.auth_url } else { cfg.auth_url.clone() },
		services: fetched.services,
	}
}
