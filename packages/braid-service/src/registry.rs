use std::{collections::HashMap, sync::Arc, time::Duration};

use braid_domain::{
	invocation::{Invocation, InvocationOutcome},
	target::Target,
};
use braid_providers::service;

use crate::{BoxFuture, ServiceHandler};

/// Calls the service over HTTP using the downstream search and feed contract.
pub struct HttpServiceHandler;
impl ServiceHandler for HttpServiceHandler {
	fn invoke<'a>(
		&'a self,
		target: &'a Target,
		invocation: &'a Invocation,
		timeout: Duration,
	) -> BoxFuture<'a, InvocationOutcome> {
		Box::pin(async move {
			let result = match invocation {
				Invocation::Search { query } => service::search(target, query, timeout).await,
				Invocation::Feed { since_ms } => service::feed(target, *since_ms, timeout).await,
			};

			match result {
				Ok(items) => InvocationOutcome::Success { items },
				Err(err) => InvocationOutcome::failure(err.to_string()),
			}
		})
	}
}

/// Picks the handler for a service ID, falling back to HTTP.
#[derive(Clone)]
pub struct ServiceRegistry {
	fallback: Arc<dyn ServiceHandler>,
	handlers: HashMap<String, Arc<dyn ServiceHandler>>,
}
impl ServiceRegistry {
	pub fn new(fallback: Arc<dyn ServiceHandler>) -> Self {
		Self { fallback, handlers: HashMap::new() }
	}

	pub fn with_handler(
		mut self,
		service_id: impl Into<String>,
		handler: Arc<dyn ServiceHandler>,
	) -> Self {
		self.handlers.insert(service_id.into(), handler);

		self
	}

	pub fn handler_for(&self, service_id: &str) -> &Arc<dyn ServiceHandler> {
		self.handlers.get(service_id).unwrap_or(&self.fallback)
	}
}
impl Default for ServiceRegistry {
	fn default() -> Self {
		Self::new(Arc::new(HttpServiceHandler))
	}
}
