use sqlx::{PgExecutor, types::Json};
use time::OffsetDateTime;

use braid_domain::account::{AccountProfile, AccountState, LinkedAccount};

use crate::{Error, Result, models::ProviderAccountRow};

/// Links an account, or refreshes its profile. Relinking clears any recorded error.
///
/// Account linking happens outside this service and the engine never calls
/// this. It seeds accounts for the database smoke tests and local setups.
pub async fn upsert_provider_account<'e, E>(
	executor: E,
	user_id: &str,
	provider_id: &str,
	account_id: &str,
	profile: &AccountProfile,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO provider_accounts (user_id, provider_id, account_id, profile, state)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (user_id, provider_id, account_id) DO UPDATE
SET
	profile = EXCLUDED.profile,
	state = EXCLUDED.state,
	last_error_message = NULL,
	last_error_at = NULL,
	last_updated = now()",
	)
	.bind(user_id)
	.bind(provider_id)
	.bind(account_id)
	.bind(Json(profile))
	.bind(AccountState::Active.as_str())
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_accounts_by_user<'e, E>(executor: E, user_id: &str) -> Result<Vec<LinkedAccount>>
where
	E: PgExecutor<'e>,
{
	let rows: Vec<ProviderAccountRow> = sqlx::query_as(
		"\
SELECT
	user_id,
	provider_id,
	account_id,
	profile,
	state,
	last_error_message,
	last_error_at,
	last_updated
FROM provider_accounts
WHERE user_id = $1
ORDER BY provider_id, account_id",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(LinkedAccount::from).collect())
}

pub async fn mark_account_error<'e, E>(
	executor: E,
	user_id: &str,
	provider_id: &str,
	account_id: &str,
	message: &str,
	at: OffsetDateTime,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE provider_accounts
SET
	state = $4,
	last_error_message = $5,
	last_error_at = $6,
	last_updated = $6
WHERE user_id = $1 AND provider_id = $2 AND account_id = $3",
	)
	.bind(user_id)
	.bind(provider_id)
	.bind(account_id)
	.bind(AccountState::Error.as_str())
	.bind(message)
	.bind(at)
	.execute(executor)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!(
			"No account {account_id} for provider {provider_id} and user {user_id}."
		)));
	}

	Ok(())
}
