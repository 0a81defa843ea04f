//! Builders for catalogs, accounts, and items used across test suites.

use serde_json::{Map, Value, json};
use time::OffsetDateTime;

use braid_domain::{
	account::{AccountProfile, AccountState, LinkedAccount},
	descriptor::{ProviderDescriptor, ServiceDescriptor},
	item::ResultItem,
};
use braid_service::{CatalogProvider, ProviderCatalog};

/// A provider whose services all point at `http://127.0.0.1:9/<service_id>`.
pub fn provider(provider_id: &str, service_ids: &[&str]) -> CatalogProvider {
	CatalogProvider {
		descriptor: ProviderDescriptor {
			id: provider_id.to_string(),
			name: provider_id.to_string(),
			logo_square_url: String::new(),
			auth_url: format!("https://auth.invalid/{provider_id}"),
			services: service_ids
				.iter()
				.map(|service_id| ServiceDescriptor {
					id: service_id.to_string(),
					name: service_id.to_string(),
					logo_square_url: String::new(),
					service_url: format!("http://127.0.0.1:9/{service_id}"),
				})
				.collect(),
		},
		api_key: None,
		default_headers: Map::new(),
	}
}

pub fn catalog(providers: Vec<CatalogProvider>) -> ProviderCatalog {
	ProviderCatalog::new(providers)
}

pub fn account(
	user_id: &str,
	provider_id: &str,
	account_id: &str,
	service_ids: &[&str],
) -> LinkedAccount {
	LinkedAccount {
		user_id: user_id.to_string(),
		provider_id: provider_id.to_string(),
		account_id: account_id.to_string(),
		profile: AccountProfile {
			name: format!("{account_id} owner"),
			account_name: Some(format!("{account_id}@example.com")),
			image_url: None,
			service_ids: service_ids.iter().map(|id| id.to_string()).collect(),
		},
		state: AccountState::Active,
		last_error_message: None,
		last_error_at: None,
		last_updated: OffsetDateTime::now_utc(),
	}
}

/// An item whose identity fields are overwritten by whoever returns it.
pub fn item(label: &str, timestamp: Option<i64>) -> ResultItem {
	ResultItem {
		provider_id: String::new(),
		service_id: String::new(),
		timestamp,
		icon_url: String::new(),
		details: json!({ "label": label }),
		url: None,
	}
}

pub fn label(item: &ResultItem) -> &str {
	item.details.get("label").and_then(Value::as_str).unwrap_or_default()
}
