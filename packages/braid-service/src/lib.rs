pub mod accounts;
pub mod catalog;
pub mod feed;
pub mod invoker;
pub mod poll;
pub mod registry;
pub mod search;
pub mod services;
pub mod store;

mod error;
mod fanout;

pub use catalog::{CatalogProvider, ProviderCatalog};
pub use error::{Error, Result};
pub use invoker::Invoker;
pub use poll::{PollResult, ServiceStatus};
pub use registry::{HttpServiceHandler, ServiceRegistry};
pub use services::{AccountListing, ProviderListing, ServiceListing};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use braid_config::Aggregation;
use braid_domain::{
	RequestContext,
	account::LinkedAccount,
	invocation::{Invocation, InvocationOutcome},
	item::ResultItem,
	job::{JobKind, OutcomeKey, ServiceOutcome},
	target::Target,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable record of every job's per-service outcomes and payloads.
pub trait JobStore
where
	Self: Send + Sync,
{
	/// Fails with `Error::Conflict` when the key already exists.
	fn create_outcome<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		kind: JobKind,
		pending: bool,
		delivered: bool,
	) -> BoxFuture<'a, Result<()>>;

	fn update_outcome_state<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		pending: bool,
		error_message: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>>;

	/// Claims a resolved, undelivered outcome. Exactly one caller ever sees `true` per key.
	fn mark_delivered<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
	) -> BoxFuture<'a, Result<bool>>;

	fn store_result_payload<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
		items: &'a [ResultItem],
	) -> BoxFuture<'a, Result<()>>;

	/// Ordered by provider, service, then account.
	fn find_outcomes_by_job<'a>(
		&'a self,
		ctx: &'a RequestContext,
		job_id: Uuid,
	) -> BoxFuture<'a, Result<Vec<ServiceOutcome>>>;

	fn find_payload<'a>(
		&'a self,
		ctx: &'a RequestContext,
		key: &'a OutcomeKey,
	) -> BoxFuture<'a, Result<Option<Vec<ResultItem>>>>;
}

/// A user's linked accounts and the services they can be queried through.
pub trait AccountRegistry
where
	Self: Send + Sync,
{
	/// Empty when the user has linked nothing.
	fn list_enabled_services_for_user<'a>(
		&'a self,
		ctx: &'a RequestContext,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Target>>>;

	fn report_account_error<'a>(
		&'a self,
		ctx: &'a RequestContext,
		user_id: &'a str,
		provider_id: &'a str,
		account_id: &'a str,
		message: &'a str,
		at: OffsetDateTime,
	) -> BoxFuture<'a, Result<()>>;

	fn list_accounts_for_user<'a>(
		&'a self,
		ctx: &'a RequestContext,
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<LinkedAccount>>>;
}

/// Performs one call against one downstream service. Failures are reported as outcomes.
pub trait ServiceHandler
where
	Self: Send + Sync,
{
	fn invoke<'a>(
		&'a self,
		target: &'a Target,
		invocation: &'a Invocation,
		timeout: Duration,
	) -> BoxFuture<'a, InvocationOutcome>;
}

#[derive(Clone, Debug, Serialize)]
pub struct StartResult {
	/// Absent when the user has no enabled services.
	pub job_id: Option<Uuid>,
	pub poll: Option<PollResult>,
}
impl StartResult {
	fn empty() -> Self {
		Self { job_id: None, poll: None }
	}
}

pub struct AggregationService {
	pub cfg: Aggregation,
	pub store: Arc<dyn JobStore>,
	pub accounts: Arc<dyn AccountRegistry>,
	pub catalog: Arc<ProviderCatalog>,
	pub invoker: Arc<Invoker>,
}
impl AggregationService {
	pub fn new(
		cfg: Aggregation,
		store: Arc<dyn JobStore>,
		accounts: Arc<dyn AccountRegistry>,
		catalog: Arc<ProviderCatalog>,
	) -> Self {
		Self::with_registry(cfg, store, accounts, catalog, ServiceRegistry::default())
	}

	pub fn with_registry(
		cfg: Aggregation,
		store: Arc<dyn JobStore>,
		accounts: Arc<dyn AccountRegistry>,
		catalog: Arc<ProviderCatalog>,
		registry: ServiceRegistry,
	) -> Self {
		let invoker = Arc::new(Invoker::new(registry, &cfg));

		Self { cfg, store, accounts, catalog, invoker }
	}
}
