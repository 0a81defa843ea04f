pub mod account;
pub mod descriptor;
pub mod feed;
pub mod invocation;
pub mod item;
pub mod job;
pub mod target;
pub mod time_serde;

use uuid::Uuid;

/// Per-request context threaded through store and registry calls for tracing.
#[derive(Clone, Debug)]
pub struct RequestContext {
	pub request_id: Uuid,
	pub user_id: String,
}
impl RequestContext {
	pub fn new(user_id: impl Into<String>) -> Self {
		Self { request_id: Uuid::new_v4(), user_id: user_id.into() }
	}
}
