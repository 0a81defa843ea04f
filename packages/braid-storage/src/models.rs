use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use braid_domain::{
	account::{AccountProfile, AccountState, LinkedAccount},
	item::ResultItem,
	job::{JobKind, OutcomeKey, ServiceOutcome},
};

use crate::{Error, Result};

#[derive(Debug, sqlx::FromRow)]
pub struct OutcomeRow {
	pub job_id: Uuid,
	pub provider_id: String,
	pub service_id: String,
	pub account_id: String,
	pub job_kind: String,
	pub pending: bool,
	pub delivered: bool,
	pub error_message: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl OutcomeRow {
	pub fn into_outcome(self) -> Result<ServiceOutcome> {
		let kind = JobKind::parse(&self.job_kind).ok_or_else(|| {
			Error::InvalidArgument(format!("Unknown job kind {:?}.", self.job_kind))
		})?;

		Ok(ServiceOutcome {
			key: OutcomeKey {
				job_id: self.job_id,
				provider_id: self.provider_id,
				service_id: self.service_id,
				account_id: self.account_id,
			},
			kind,
			pending: self.pending,
			delivered: self.delivered,
			error_message: self.error_message,
			created_at: self.created_at,
		})
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct PayloadRow {
	pub job_id: Uuid,
	pub provider_id: String,
	pub service_id: String,
	pub account_id: String,
	pub items: Json<Vec<ResultItem>>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProviderAccountRow {
	pub user_id: String,
	pub provider_id: String,
	pub account_id: String,
	pub profile: Json<AccountProfile>,
	pub state: String,
	pub last_error_message: Option<String>,
	pub last_error_at: Option<OffsetDateTime>,
	pub last_updated: OffsetDateTime,
}
impl From<ProviderAccountRow> for LinkedAccount {
	fn from(row: ProviderAccountRow) -> Self {
		Self {
			user_id: row.user_id,
			provider_id: row.provider_id,
			account_id: row.account_id,
			profile: row.profile.0,
			state: AccountState::parse(&row.state),
			last_error_message: row.last_error_message,
			last_error_at: row.last_error_at,
			last_updated: row.last_updated,
		}
	}
}
