use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
	Search,
	Feed,
}
impl JobKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Search => "search",
			Self::Feed => "feed",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"search" => Some(Self::Search),
			"feed" => Some(Self::Feed),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
	/// Every outcome is still pending.
	Initiated,
	PartiallyResolved,
	/// No outcome is pending, whatever mix of success and failure.
	FullyResolved,
}
impl JobState {
	pub fn from_pending<I>(pending_flags: I) -> Self
	where
		I: IntoIterator<Item = bool>,
	{
		let mut pending = 0_usize;
		let mut resolved = 0_usize;

		for flag in pending_flags {
			if flag {
				pending += 1;
			} else {
				resolved += 1;
			}
		}

		match (pending, resolved) {
			(0, _) => Self::FullyResolved,
			(_, 0) => Self::Initiated,
			_ => Self::PartiallyResolved,
		}
	}
}

/// Composite key shared by an outcome and its payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutcomeKey {
	pub job_id: Uuid,
	pub provider_id: String,
	pub service_id: String,
	pub account_id: String,
}

/// Status of one service within a job.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceOutcome {
	pub key: OutcomeKey,
	pub kind: JobKind,
	pub pending: bool,
	/// Set once the payload has been handed to a poller. Never reset.
	pub delivered: bool,
	pub error_message: Option<String>,
	pub created_at: OffsetDateTime,
}
impl ServiceOutcome {
	/// Resolved but not yet handed out.
	pub fn is_deliverable(&self) -> bool {
		!self.pending && !self.delivered
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn state_follows_pending_flags() {
		assert_eq!(JobState::from_pending([true, true]), JobState::Initiated);
		assert_eq!(JobState::from_pending([true, false]), JobState::PartiallyResolved);
		assert_eq!(JobState::from_pending([false, false]), JobState::FullyResolved);
		assert_eq!(JobState::from_pending(Vec::<bool>::new()), JobState::FullyResolved);
	}

	#[test]
	fn kind_round_trips_through_storage_label() {
		for kind in [JobKind::Search, JobKind::Feed] {
			assert_eq!(JobKind::parse(kind.as_str()), Some(kind));
		}

		assert_eq!(JobKind::parse("timeline"), None);
	}
}
