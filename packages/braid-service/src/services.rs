use serde::Serialize;
use time::OffsetDateTime;

use braid_domain::{RequestContext, account::AccountState};

use crate::{AggregationService, Result};

/// A catalog provider with the user's accounts at it.
#[derive(Clone, Debug, Serialize)]
pub struct ProviderListing {
	pub provider_id: String,
	pub name: String,
	pub logo_square_url: String,
	pub auth_url: String,
	pub services: Vec<ServiceListing>,
	pub accounts: Vec<AccountListing>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ServiceListing {
	pub service_id: String,
	pub name: String,
	pub logo_square_url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AccountListing {
	pub account_id: String,
	pub name: String,
	pub account_name: Option<String>,
	pub image_url: Option<String>,
	pub service_ids: Vec<String>,
	pub state: AccountState,
	pub last_error_message: Option<String>,
	#[serde(with = "braid_domain::time_serde::option")]
	pub last_error_at: Option<OffsetDateTime>,
}

impl AggregationService {
	pub async fn list_services(
		&self,
		ctx: &RequestContext,
		user_id: &str,
	) -> Result<Vec<ProviderListing>> {
		let accounts = self.accounts.list_accounts_for_user(ctx, user_id).await?;

		Ok(self
			.catalog
			.providers()
			.iter()
			.map(|provider| {
				let descriptor = &provider.descriptor;

				ProviderListing {
					provider_id: descriptor.id.clone(),
					name: descriptor.name.clone(),
					logo_square_url: descriptor.logo_square_url.clone(),
					auth_url: descriptor.auth_url.clone(),
					services: descriptor
						.services
						.iter()
						.map(|service| ServiceListing {
							service_id: service.id.clone(),
							name: service.name.clone(),
							logo_square_url: service.logo_square_url.clone(),
						})
						.collect(),
					accounts: accounts
						.iter()
						.filter(|account| account.provider_id == descriptor.id)
						.map(|account| AccountListing {
							account_id: account.account_id.clone(),
							name: account.profile.name.clone(),
							account_name: account.profile.account_name.clone(),
							image_url: account.profile.image_url.clone(),
							service_ids: account.profile.service_ids.clone(),
							state: account.state,
							last_error_message: account.last_error_message.clone(),
							last_error_at: account.last_error_at,
						})
						.collect(),
				}
			})
			.collect())
	}
}
