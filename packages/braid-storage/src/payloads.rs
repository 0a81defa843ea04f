use sqlx::{PgExecutor, types::Json};

use braid_domain::{item::ResultItem, job::OutcomeKey};

use crate::{Result, models::PayloadRow};

pub async fn insert_payload<'e, E>(executor: E, key: &OutcomeKey, items: &[ResultItem]) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO service_payloads (job_id, provider_id, service_id, account_id, items)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(key.job_id)
	.bind(key.provider_id.as_str())
	.bind(key.service_id.as_str())
	.bind(key.account_id.as_str())
	.bind(Json(items))
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_payload<'e, E>(executor: E, key: &OutcomeKey) -> Result<Option<Vec<ResultItem>>>
where
	E: PgExecutor<'e>,
{
	let row: Option<PayloadRow> = sqlx::query_as(
		"\
SELECT job_id, provider_id, service_id, account_id, items, created_at
FROM service_payloads
WHERE job_id = $1 AND provider_id = $2 AND service_id = $3 AND account_id = $4",
	)
	.bind(key.job_id)
	.bind(key.provider_id.as_str())
	.bind(key.service_id.as_str())
	.bind(key.account_id.as_str())
	.fetch_optional(executor)
	.await?;

	Ok(row.map(|row| row.items.0))
}
