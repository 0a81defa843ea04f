use time::{Duration, OffsetDateTime};

use braid_domain::{RequestContext, feed, invocation::Invocation};

use crate::{AggregationService, Result, StartResult};

impl AggregationService {
	/// `since_ms` is clamped to the configured lookback window. `None` asks for the whole window.
	pub async fn start_feed(
		&self,
		ctx: &RequestContext,
		user_id: &str,
		since_ms: Option<i64>,
	) -> Result<StartResult> {
		let lookback = Duration::hours(i64::from(self.cfg.feed_lookback_hours));
		let since_ms = feed::clamp_since(since_ms, OffsetDateTime::now_utc(), lookback);

		self.start_job(ctx, user_id, Invocation::Feed { since_ms }).await
	}
}
