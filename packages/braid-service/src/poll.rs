use serde::Serialize;
use uuid::Uuid;

use braid_domain::{
	RequestContext, feed,
	item::ResultItem,
	job::{JobKind, JobState},
};

use crate::{AggregationService, Error, Result};

#[derive(Clone, Debug, Serialize)]
pub struct PollResult {
	pub job_id: Uuid,
	pub kind: JobKind,
	pub state: JobState,
	pub service_results: Vec<ServiceStatus>,
	/// Feed items delivered by this poll, newest first. Always empty for searches.
	pub items: Vec<ResultItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ServiceStatus {
	pub provider_id: String,
	pub service_id: String,
	pub account_id: String,
	pub pending: bool,
	pub delivered: bool,
	pub error_message: Option<String>,
	/// Search results delivered by this poll.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub results: Option<Vec<ResultItem>>,
}

impl AggregationService {
	/// Reports every outcome of the job and hands out each resolved payload exactly once.
	pub async fn poll(&self, ctx: &RequestContext, job_id: Uuid) -> Result<PollResult> {
		self.poll_job(ctx, job_id, None).await
	}

	/// Like `poll`, but a job of another kind is reported as missing and left untouched.
	pub async fn poll_kind(
		&self,
		ctx: &RequestContext,
		job_id: Uuid,
		kind: JobKind,
	) -> Result<PollResult> {
		self.poll_job(ctx, job_id, Some(kind)).await
	}

	async fn poll_job(
		&self,
		ctx: &RequestContext,
		job_id: Uuid,
		expected: Option<JobKind>,
	) -> Result<PollResult> {
		let outcomes = self.store.find_outcomes_by_job(ctx, job_id).await?;
		let kind = match (outcomes.first().map(|outcome| outcome.kind), expected) {
			(Some(kind), None) => kind,
			(Some(kind), Some(expected)) if kind == expected => kind,
			(_, expected) => {
				let label = expected.map(JobKind::as_str).unwrap_or("aggregation");

				return Err(Error::NotFound { message: format!("No {label} job {job_id}.") });
			},
		};
		let state = JobState::from_pending(outcomes.iter().map(|outcome| outcome.pending));
		let mut service_results = Vec::with_capacity(outcomes.len());
		let mut feed_batches = Vec::new();

		for outcome in outcomes {
			let mut delivered = outcome.delivered;
			let mut results = None;

			if outcome.is_deliverable() {
				// Failed services have nothing to hand out but are still marked delivered.
				let payload = match outcome.error_message {
					Some(_) => None,
					None => Some(
						self.store.find_payload(ctx, &outcome.key).await?.unwrap_or_default(),
					),
				};

				if self.store.mark_delivered(ctx, &outcome.key).await? {
					delivered = true;

					match (kind, payload) {
						(JobKind::Search, payload) => results = payload,
						(JobKind::Feed, Some(items)) => feed_batches.push(items),
						(JobKind::Feed, None) => {},
					}
				}
			}

			service_results.push(ServiceStatus {
				provider_id: outcome.key.provider_id,
				service_id: outcome.key.service_id,
				account_id: outcome.key.account_id,
				pending: outcome.pending,
				delivered,
				error_message: outcome.error_message,
				results,
			});
		}

		Ok(PollResult {
			job_id,
			kind,
			state,
			service_results,
			items: feed::merge_feed_items(feed_batches),
		})
	}
}
