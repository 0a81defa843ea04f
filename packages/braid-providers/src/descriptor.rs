use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use braid_domain::descriptor::{ProviderDescriptor, ServiceDescriptor};

use crate::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProvider {
	id: String,
	name: String,
	#[serde(default)]
	logo_square_url: String,
	#[serde(default)]
	auth_url: String,
	#[serde(default)]
	services: Vec<WireService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireService {
	id: String,
	name: String,
	#[serde(default)]
	logo_square_url: String,
	service_url: String,
}

/// Fetches a provider's self-description from its descriptor endpoint.
pub async fn fetch_descriptor(url: &str, timeout: Duration) -> Result<ProviderDescriptor> {
	let client = Client::builder().timeout(timeout).build()?;
	let res = client.get(url).send().await?;
	let body = crate::read_body(res).await?;

	parse_descriptor(&body)
}

fn parse_descriptor(body: &str) -> Result<ProviderDescriptor> {
	let wire: WireProvider = serde_json::from_str(body)?;

	Ok(ProviderDescriptor {
		id: wire.id,
		name: wire.name,
		logo_square_url: wire.logo_square_url,
		auth_url: wire.auth_url,
		services: wire
			.services
			.into_iter()
			.map(|service| ServiceDescriptor {
				id: service.id,
				name: service.name,
				logo_square_url: service.logo_square_url,
				service_url: service.service_url.trim_end_matches('/').to_string(),
			})
			.collect(),
	})
}
