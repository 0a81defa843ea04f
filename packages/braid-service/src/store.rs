use sqlx::PgPool;
use uuid::Uuid;

use braid_domain::{
	RequestContext,
	item::ResultItem,
	job::{JobKind, OutcomeKey, ServiceOutcome},
};
use braid_storage::{outcomes, payloads};

use crate::{BoxFuture, JobStore, Result};

/// `JobStore` over the `service_outcomes` and `service_payloads` tables.
#[derive(Clone)]
pub struct PgJobStore {
	pool: PgPool,
}
impl PgJobStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}
impl JobStore for PgJobStore {
	fn create_outcome<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		kind: JobKind,
		pending: bool,
		delivered: bool,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			tracing::debug!(
				request_id = %ctx.request_id,
				job_id = %key.job_id,
				provider_id = %key.provider_id,
				service_id = %key.service_id,
				"Creating service outcome."
			);

			outcomes::insert_outcome(&self.pool, key, kind, pending, delivered).await?;

			Ok(())
		})
	}

	fn update_outcome_state<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		pending: bool,
		error_message: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			tracing::debug!(
				request_id = %ctx.request_id,
				job_id = %key.job_id,
				service_id = %key.service_id,
				pending,
				"Updating service outcome."
			);

			outcomes::update_outcome_state(&self.pool, key, pending, error_message).await?;

			Ok(())
		})
	}

	fn mark_delivered<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(outcomes::mark_outcome_delivered(&self.pool, key).await?) })
	}

	fn store_result_payload<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		items: &'a [ResultItem],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			tracing::debug!(
				request_id = %ctx.request_id,
				job_id = %key.job_id,
				service_id = %key.service_id,
				items = items.len(),
				"Storing service payload."
			);

			payloads::insert_payload(&self.pool, key, items).await?;

			Ok(())
		})
	}

	fn find_outcomes_by_job<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		job_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<ServiceOutcome>>> {
		Box::pin(async move { Ok(outcomes::list_outcomes_by_job(&self.pool, job_id).await?) })
	}

	fn find_payload<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
	) -> BoxFuture<'a, Result<Option<Vec<ResultItem>>>> {
		Box::pin(async move { Ok(payloads::get_payload(&self.pool, key).await?) })
	}
}
