use std::sync::Arc;

use sqlx::PgPool;
use time::OffsetDateTime;

use braid_domain::{RequestContext, account::LinkedAccount, target::Target};

use crate::{AccountRegistry, BoxFuture, ProviderCatalog, Result};

/// `AccountRegistry` over the `provider_accounts` table, resolved against the catalog.
#[derive(Clone)]
pub struct PgAccountRegistry {
	pool: PgPool,
	catalog: Arc<ProviderCatalog>,
}
impl PgAccountRegistry {
	pub fn new(pool: PgPool, catalog: Arc<ProviderCatalog>) -> Self {
		Self { pool, catalog }
	}
}
impl AccountRegistry for PgAccountRegistry {
	fn list_enabled_services_for_user<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Target>>> {
		Box::pin(async move {
			let accounts = braid_storage::accounts::list_accounts_by_user(&self.pool, user_id).await?;

			Ok(self.catalog.targets_for(&accounts))
		})
	}

	fn report_account_error<'a>(
		&'a self,
		ctx: &'a RequestContext,
		user_id: &'a str,
		provider_id: &'a str,
		account_id: &'a str,
		message: &'a str,
		at: OffsetDateTime,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			tracing::debug!(
				request_id = %ctx.request_id,
				provider_id,
				account_id,
				"Recording account error."
			);

			braid_storage::accounts::mark_account_error(
				&self.pool,
				user_id,
				provider_id,
				account_id,
				message,
				at,
			)
			.await?;

			Ok(())
		})
	}

	fn list_accounts_for_user<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<LinkedAccount>>> {
		Box::pin(async move {
			Ok(braid_storage::accounts::list_accounts_by_user(&self.pool, user_id).await?)
		})
	}
}
