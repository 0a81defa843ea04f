use std::time::Duration;

use tokio::time;

use braid_config::Aggregation;
use braid_domain::{
	invocation::{Invocation, InvocationOutcome},
	target::Target,
};

use crate::ServiceRegistry;

/// Runs one invocation under its mode's timeout. Never fails; every problem becomes a
/// `Failure` outcome.
pub struct Invoker {
	registry: ServiceRegistry,
	search_timeout: Duration,
	feed_timeout: Duration,
}
impl Invoker {
	pub fn new(registry: ServiceRegistry, cfg: &Aggregation) -> Self {
		Self {
			registry,
			search_timeout: Duration::from_millis(cfg.search_timeout_ms),
			feed_timeout: Duration::from_millis(cfg.feed_timeout_ms),
		}
	}

	pub fn timeout_for(&self, invocation: &Invocation) -> Duration {
		match invocation {
			Invocation::Search { .. } => self.search_timeout,
			Invocation::Feed { .. } => self.feed_timeout,
		}
	}

	pub async fn invoke(&self, target: &Target, invocation: &Invocation) -> InvocationOutcome {
		let timeout = self.timeout_for(invocation);
		let handler = self.registry.handler_for(&target.service_id);
		let outcome = match time::timeout(timeout, handler.invoke(target, invocation, timeout)).await
		{
			Ok(outcome) => outcome,
			Err(_) => InvocationOutcome::failure(format!(
				"Service did not respond within {} ms.",
				timeout.as_millis()
			)),
		};

		if let InvocationOutcome::Failure { message } = &outcome {
			tracing::warn!(
				provider_id = %target.provider_id,
				service_id = %target.service_id,
				account_id = %target.account_id,
				kind = invocation.kind().as_str(),
				error = %message,
				"Service invocation failed."
			);
		}

		outcome
	}
}
