use std::{collections::HashSet, sync::Arc};

use time::OffsetDateTime;
use tokio::sync::mpsc;
use uuid::Uuid;

use braid_domain::{
	RequestContext,
	invocation::{Invocation, InvocationOutcome},
	job::OutcomeKey,
	target::Target,
};

use crate::{AccountRegistry, AggregationService, Invoker, JobStore, Result, StartResult};

/// Message stored on an outcome whose service succeeded but whose items could not be persisted.
const PAYLOAD_WRITE_FAILED: &str = "Failed to store service results.";
/// Message stored on outcomes written by a job that failed to start.
const JOB_START_FAILED: &str = "Job was not started.";

struct InvocationTask {
	ctx: RequestContext,
	store: Arc<dyn JobStore>,
	accounts: Arc<dyn AccountRegistry>,
	invoker: Arc<Invoker>,
	target: Target,
	key: OutcomeKey,
	invocation: Invocation,
	done: mpsc::Sender<()>,
}
impl InvocationTask {
	async fn run(self) {
		let outcome = self.invoker.invoke(&self.target, &self.invocation).await;

		match outcome {
			InvocationOutcome::Success { items } => self.record_success(&items).await,
			InvocationOutcome::Failure { message } => self.record_failure(&message).await,
		}

		// The receiver is gone once the initiating request has returned.
		let _ = self.done.send(()).await;
	}

	async fn record_success(&self, items: &[braid_domain::item::ResultItem]) {
		let Self { ctx, store, key, .. } = self;

		if let Err(err) = store.store_result_payload(ctx, key, items).await {
			tracing::error!(
				job_id = %key.job_id,
				provider_id = %key.provider_id,
				service_id = %key.service_id,
				error = %err,
				"Failed to store service payload."
			);

			self.resolve(Some(PAYLOAD_WRITE_FAILED)).await;

			return;
		}

		self.resolve(None).await;
	}

	async fn record_failure(&self, message: &str) {
		self.resolve(Some(message)).await;

		let Self { ctx, accounts, key, target, .. } = self;

		if let Err(err) = accounts
			.report_account_error(
				ctx,
				&target.user_id,
				&key.provider_id,
				&key.account_id,
				message,
				OffsetDateTime::now_utc(),
			)
			.await
		{
			tracing::error!(
				job_id = %key.job_id,
				provider_id = %key.provider_id,
				account_id = %key.account_id,
				error = %err,
				"Failed to record account error."
			);
		}
	}

	async fn resolve(&self, error_message: Option<&str>) {
		let Self { ctx, store, key, .. } = self;

		if let Err(err) = store.update_outcome_state(ctx, key, false, error_message).await {
			tracing::error!(
				job_id = %key.job_id,
				provider_id = %key.provider_id,
				service_id = %key.service_id,
				error = %err,
				"Failed to resolve service outcome."
			);
		}
	}
}

impl AggregationService {
	/// Records one pending outcome per target, launches every invocation, and returns the first
	/// poll once at least one has finished. Invocations keep running after this returns.
	pub(crate) async fn start_job(
		&self,
		ctx: &RequestContext,
		user_id: &str,
		invocation: Invocation,
	) -> Result<StartResult> {
		let targets = self.accounts.list_enabled_services_for_user(ctx, user_id).await?;

		if targets.is_empty() {
			tracing::info!(user_id, kind = invocation.kind().as_str(), "No enabled services.");

			return Ok(StartResult::empty());
		}

		let job_id = Uuid::new_v4();
		let kind = invocation.kind();
		let mut seen = HashSet::with_capacity(targets.len());
		let mut planned = Vec::with_capacity(targets.len());

		for target in targets {
			let key = OutcomeKey {
				job_id,
				provider_id: target.provider_id.clone(),
				service_id: target.service_id.clone(),
				account_id: target.account_id.clone(),
			};

			if !seen.insert(key.clone()) {
				tracing::warn!(
					%job_id,
					provider_id = %key.provider_id,
					service_id = %key.service_id,
					account_id = %key.account_id,
					"Skipping a repeated target."
				);

				continue;
			}

			planned.push((target, key));
		}

		for (written, (_, key)) in planned.iter().enumerate() {
			if let Err(err) = self.store.create_outcome(ctx, key, kind, true, false).await {
				self.abandon(ctx, planned[..written].iter().map(|(_, key)| key)).await;

				return Err(err);
			}
		}

		let target_count = planned.len();

		tracing::info!(
			%job_id,
			user_id,
			kind = kind.as_str(),
			targets = target_count,
			"Aggregation job started."
		);

		let (done_tx, mut done_rx) = mpsc::channel(target_count);

		for (target, key) in planned {
			let task = InvocationTask {
				ctx: ctx.clone(),
				store: self.store.clone(),
				accounts: self.accounts.clone(),
				invoker: self.invoker.clone(),
				target,
				key,
				invocation: invocation.clone(),
				done: done_tx.clone(),
			};

			tokio::spawn(task.run());
		}

		drop(done_tx);

		if done_rx.recv().await.is_none() {
			tracing::error!(%job_id, "Every invocation task ended without signalling completion.");
		}

		let poll = self.poll(ctx, job_id).await?;

		Ok(StartResult { job_id: Some(job_id), poll: Some(poll) })
	}

	/// Resolves outcomes written before job creation failed so they do not stay pending.
	async fn abandon<'a>(&self, ctx: &RequestContext, keys: impl Iterator<Item = &'a OutcomeKey>) {
		for key in keys {
			if let Err(err) =
				self.store.update_outcome_state(ctx, key, false, Some(JOB_START_FAILED)).await
			{
				tracing::error!(
					job_id = %key.job_id,
					provider_id = %key.provider_id,
					service_id = %key.service_id,
					error = %err,
					"Failed to resolve an abandoned outcome."
				);
			}
		}
	}
}
