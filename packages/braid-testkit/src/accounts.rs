use std::sync::{Arc, Mutex};

use time::OffsetDateTime;

use braid_domain::{
	RequestContext,
	account::{AccountState, LinkedAccount},
	target::Target,
};
use braid_service::{AccountRegistry, BoxFuture, Error, ProviderCatalog, Result};

/// Account registry over a fixed set of linked accounts.
pub struct StaticAccountRegistry {
	catalog: Arc<ProviderCatalog>,
	accounts: Mutex<Vec<LinkedAccount>>,
	reject_reports: bool,
}
impl StaticAccountRegistry {
	pub fn new(catalog: Arc<ProviderCatalog>, accounts: Vec<LinkedAccount>) -> Self {
		Self { catalog, accounts: Mutex::new(accounts), reject_reports: false }
	}

	/// Every `report_account_error` call fails with a storage error and leaves accounts as is.
	pub fn rejecting_reports(mut self) -> Self {
		self.reject_reports = true;

		self
	}

	pub fn account(&self, provider_id: &str, account_id: &str) -> Option<LinkedAccount> {
		self.accounts
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.iter()
			.find(|account| account.provider_id == provider_id && account.account_id == account_id)
			.cloned()
	}

	fn accounts_for(&self, user_id: &str) -> Vec<LinkedAccount> {
		self.accounts
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.iter()
			.filter(|account| account.user_id == user_id)
			.cloned()
			.collect()
	}
}
impl AccountRegistry for StaticAccountRegistry {
	fn list_enabled_services_for_user<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Target>>> {
		Box::pin(async move { Ok(self.catalog.targets_for(&self.accounts_for(user_id))) })
	}

	fn report_account_error<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		user_id: &'a str,
		provider_id: &'a str,
		account_id: &'a str,
		message: &'a str,
		at: OffsetDateTime,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if self.reject_reports {
				return Err(Error::Storage { message: "Account update rejected.".to_string() });
			}

			let mut accounts = self.accounts.lock().unwrap_or_else(|err| err.into_inner());
			let Some(account) = accounts.iter_mut().find(|account| {
				account.user_id == user_id
					&& account.provider_id == provider_id
					&& account.account_id == account_id
			}) else {
				return Err(Error::NotFound {
					message: format!("No account {account_id} for provider {provider_id}."),
				});
			};

			account.state = AccountState::Error;
			account.last_error_message = Some(message.to_string());
			account.last_error_at = Some(at);
			account.last_updated = at;

			Ok(())
		})
	}

	fn list_accounts_for_user<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<LinkedAccount>>> {
		Box::pin(async move { Ok(self.accounts_for(user_id)) })
	}
}
