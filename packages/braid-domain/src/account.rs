use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
	Active,
	Error,
}
impl AccountState {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Active => "active",
			Self::Error => "error",
		}
	}

	/// Unknown values read back as `Error` so the UI still prompts for re-authentication.
	pub fn parse(raw: &str) -> Self {
		if raw.eq_ignore_ascii_case("active") { Self::Active } else { Self::Error }
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	/// Services the user authorized for this account.
	#[serde(default)]
	pub service_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
	pub user_id: String,
	pub provider_id: String,
	pub account_id: String,
	pub profile: AccountProfile,
	pub state: AccountState,
	pub last_error_message: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub last_error_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde")]
	pub last_updated: OffsetDateTime,
}
impl LinkedAccount {
	pub fn has_service(&self, service_id: &str) -> bool {
		self.profile.service_ids.iter().any(|id| id == service_id)
	}
}
