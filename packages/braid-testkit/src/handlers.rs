use std::{
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use braid_domain::{
	invocation::{Invocation, InvocationOutcome},
	item::ResultItem,
	target::Target,
};
use braid_service::{BoxFuture, ServiceHandler};

/// Replies with a fixed outcome after a fixed delay, recording what it was asked.
pub struct ScriptedHandler {
	delay: Duration,
	outcome: InvocationOutcome,
	calls: AtomicUsize,
	invocations: Mutex<Vec<Invocation>>,
}
impl ScriptedHandler {
	pub fn succeed(delay: Duration, items: Vec<ResultItem>) -> Self {
		Self::new(delay, InvocationOutcome::Success { items })
	}

	pub fn fail(delay: Duration, message: &str) -> Self {
		Self::new(delay, InvocationOutcome::failure(message))
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn invocations(&self) -> Vec<Invocation> {
		self.invocations.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn new(delay: Duration, outcome: InvocationOutcome) -> Self {
		Self { delay, outcome, calls: AtomicUsize::new(0), invocations: Mutex::new(Vec::new()) }
	}
}
impl ServiceHandler for ScriptedHandler {
	fn invoke<'a>(
		&'a self,
		target: &'a Target,
		invocation: &'a Invocation,
		_timeout: Duration,
	) -> BoxFuture<'a, InvocationOutcome> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.invocations.lock().unwrap_or_else(|err| err.into_inner()).push(invocation.clone());

			tokio::time::sleep(self.delay).await;

			match &self.outcome {
				InvocationOutcome::Success { items } => InvocationOutcome::Success {
					items: items
						.iter()
						.cloned()
						.map(|mut item| {
							item.provider_id = target.provider_id.clone();
							item.service_id = target.service_id.clone();

							item
						})
						.collect(),
				},
				failure => failure.clone(),
			}
		})
	}
}
