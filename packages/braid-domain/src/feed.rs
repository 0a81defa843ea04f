use time::{Duration, OffsetDateTime};

use crate::{item::ResultItem, time_serde};

/// Clamps a requested feed watermark so no request reaches further back than `lookback`.
/// A missing watermark means the whole window.
pub fn clamp_since(requested_ms: Option<i64>, now: OffsetDateTime, lookback: Duration) -> i64 {
	let floor = time_serde::to_unix_millis(now - lookback);

	match requested_ms {
		Some(requested) => requested.max(floor),
		None => floor,
	}
}

/// Merges per-service feed batches into one list, newest first. Items without a timestamp sort
/// last; ties keep their arrival order.
pub fn merge_feed_items<I>(batches: I) -> Vec<ResultItem>
where
	I: IntoIterator<Item = Vec<ResultItem>>,
{
	let mut merged: Vec<ResultItem> = batches.into_iter().flatten().collect();

	merged.sort_by(|a, b| match (a.timestamp, b.timestamp) {
		(Some(left), Some(right)) => right.cmp(&left),
		(Some(_), None) => std::cmp::Ordering::Less,
		(None, Some(_)) => std::cmp::Ordering::Greater,
		(None, None) => std::cmp::Ordering::Equal,
	});

	merged
}

#[cfg(test)]
mod tests {
	use serde_json::Value;
	use time::macros::datetime;

	use super::*;

	fn item(service_id: &str, timestamp: Option<i64>) -> ResultItem {
		ResultItem {
			provider_id: "p".to_string(),
			service_id: service_id.to_string(),
			timestamp,
			icon_url: String::new(),
			details: Value::Null,
			url: None,
		}
	}

	#[test]
	fn clamps_old_watermark_to_lookback_floor() {
		let now = datetime!(2026-10-18 12:00 UTC);
		let floor = time_serde::to_unix_millis(datetime!(2026-10-17 12:00 UTC));

		assert_eq!(clamp_since(Some(0), now, Duration::hours(24)), floor);
		assert_eq!(clamp_since(None, now, Duration::hours(24)), floor);
		assert_eq!(clamp_since(Some(floor + 5), now, Duration::hours(24)), floor + 5);
	}

	#[test]
	fn merges_batches_newest_first() {
		let merged = merge_feed_items([
			vec![item("a", Some(10)), item("a", None), item("a", Some(30))],
			vec![item("b", Some(20)), item("b", Some(40))],
		]);
		let order: Vec<_> = merged.iter().map(|item| item.timestamp).collect();

		assert_eq!(order, vec![Some(40), Some(30), Some(20), Some(10), None]);
	}
}
