use braid_domain::{RequestContext, invocation::Invocation};

use crate::{AggregationService, Error, Result, StartResult};

impl AggregationService {
	pub async fn start_search(
		&self,
		ctx: &RequestContext,
		user_id: &str,
		query: &str,
	) -> Result<StartResult> {
		let query = query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Search query must be non-empty.".to_string(),
			});
		}

		self.start_job(ctx, user_id, Invocation::Search { query: query.to_string() }).await
	}
}
