use std::{
	collections::{BTreeMap, HashMap},
	sync::Mutex,
};

use time::OffsetDateTime;
use uuid::Uuid;

use braid_domain::{
	RequestContext,
	item::ResultItem,
	job::{JobKind, OutcomeKey, ServiceOutcome},
};
use braid_service::{BoxFuture, Error, JobStore, Result};

#[derive(Default)]
struct State {
	outcomes: BTreeMap<OutcomeKey, ServiceOutcome>,
	payloads: HashMap<OutcomeKey, Vec<ResultItem>>,
}

/// In-process `JobStore` with the same key and delivery rules as the Postgres store.
#[derive(Default)]
pub struct MemoryJobStore {
	state: Mutex<State>,
	reject_payloads: bool,
	outcome_limit: Option<usize>,
}
impl MemoryJobStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every `store_result_payload` call fails with a storage error.
	pub fn rejecting_payloads(mut self) -> Self {
		self.reject_payloads = true;

		self
	}

	/// `create_outcome` fails once `limit` outcomes are stored.
	pub fn with_outcome_limit(mut self, limit: usize) -> Self {
		self.outcome_limit = Some(limit);

		self
	}

	pub fn outcome_count(&self) -> usize {
		self.lock().outcomes.len()
	}

	pub fn payload_count(&self) -> usize {
		self.lock().payloads.len()
	}

	pub fn outcomes(&self) -> Vec<ServiceOutcome> {
		self.lock().outcomes.values().cloned().collect()
	}

	pub fn outcomes_for(&self, job_id: Uuid) -> Vec<ServiceOutcome> {
		self.lock()
			.outcomes
			.values()
			.filter(|outcome| outcome.key.job_id == job_id)
			.cloned()
			.collect()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl JobStore for MemoryJobStore {
	fn create_outcome<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		kind: JobKind,
		pending: bool,
		delivered: bool,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut state = self.lock();

			if self.outcome_limit.is_some_and(|limit| state.outcomes.len() >= limit) {
				return Err(Error::Storage { message: "Outcome table is full.".to_string() });
			}
			if state.outcomes.contains_key(key) {
				return Err(Error::Conflict { message: format!("Outcome {key:?} already exists.") });
			}

			state.outcomes.insert(
				key.clone(),
				ServiceOutcome {
					key: key.clone(),
					kind,
					pending,
					delivered,
					error_message: None,
					created_at: OffsetDateTime::now_utc(),
				},
			);

			Ok(())
		})
	}

	fn update_outcome_state<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		pending: bool,
		error_message: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let Some(outcome) = self.lock().outcomes.get_mut(key) {
				outcome.pending = pending;

				if let Some(message) = error_message {
					outcome.error_message = Some(message.to_string());
				}
			}

			Ok(())
		})
	}

	fn mark_delivered<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let mut state = self.lock();
			let Some(outcome) = state.outcomes.get_mut(key) else {
				return Ok(false);
			};

			if outcome.pending || outcome.delivered {
				return Ok(false);
			}

			outcome.delivered = true;

			Ok(true)
		})
	}

	fn store_result_payload<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		items: &'a [ResultItem],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if self.reject_payloads {
				return Err(Error::Storage { message: "Payload write rejected.".to_string() });
			}

			let mut state = self.lock();

			if state.payloads.contains_key(key) {
				return Err(Error::Conflict { message: format!("Payload {key:?} already exists.") });
			}

			state.payloads.insert(key.clone(), items.to_vec());

			Ok(())
		})
	}

	fn find_outcomes_by_job<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		job_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<ServiceOutcome>>> {
		Box::pin(async move { Ok(self.outcomes_for(job_id)) })
	}

	fn find_payload<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		key: &'a OutcomeKey,
	) -> BoxFuture<'a, Result<Option<Vec<ResultItem>>>> {
		Box::pin(async move { Ok(self.lock().payloads.get(key).cloned()) })
	}
}
