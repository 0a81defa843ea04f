use sqlx::PgExecutor;
use uuid::Uuid;

use braid_domain::job::{JobKind, OutcomeKey, ServiceOutcome};

use crate::{Result, models::OutcomeRow};

pub async fn insert_outcome<'e, E>(
	executor: E,
	key: &OutcomeKey,
	kind: JobKind,
	pending: bool,
	delivered: bool,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO service_outcomes (
	job_id,
	provider_id,
	service_id,
	account_id,
	job_kind,
	pending,
	delivered
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(key.job_id)
	.bind(key.provider_id.as_str())
	.bind(key.service_id.as_str())
	.bind(key.account_id.as_str())
	.bind(kind.as_str())
	.bind(pending)
	.bind(delivered)
	.execute(executor)
	.await?;

	Ok(())
}

/// Targeted update of the resolution fields. A `None` error keeps any message already stored.
pub async fn update_outcome_state<'e, E>(
	executor: E,
	key: &OutcomeKey,
	pending: bool,
	error_message: Option<&str>,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
UPDATE service_outcomes
SET
	pending = $5,
	error_message = COALESCE($6, error_message),
	updated_at = now()
WHERE job_id = $1 AND provider_id = $2 AND service_id = $3 AND account_id = $4",
	)
	.bind(key.job_id)
	.bind(key.provider_id.as_str())
	.bind(key.service_id.as_str())
	.bind(key.account_id.as_str())
	.bind(pending)
	.bind(error_message)
	.execute(executor)
	.await?;

	Ok(())
}

/// Flips `delivered` on a resolved outcome. Returns `true` only for the caller whose update
/// changed the row.
pub async fn mark_outcome_delivered<'e, E>(executor: E, key: &OutcomeKey) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE service_outcomes
SET delivered = TRUE, updated_at = now()
WHERE job_id = $1
	AND provider_id = $2
	AND service_id = $3
	AND account_id = $4
	AND pending = FALSE
	AND delivered = FALSE",
	)
	.bind(key.job_id)
	.bind(key.provider_id.as_str())
	.bind(key.service_id.as_str())
	.bind(key.account_id.as_str())
	.execute(executor)
	.await?;

	Ok(result.rows_affected() == 1)
}

pub async fn list_outcomes_by_job<'e, E>(executor: E, job_id: Uuid) -> Result<Vec<ServiceOutcome>>
where
	E: PgExecutor<'e>,
{
	let rows: Vec<OutcomeRow> = sqlx::query_as(
		"\
SELECT
	job_id,
	provider_id,
	service_id,
	account_id,
	job_kind,
	pending,
	delivered,
	error_message,
	created_at,
	updated_at
FROM service_outcomes
WHERE job_id = $1
ORDER BY provider_id, service_id, account_id",
	)
	.bind(job_id)
	.fetch_all(executor)
	.await?;

	rows.into_iter().map(OutcomeRow::into_outcome).collect()
}
