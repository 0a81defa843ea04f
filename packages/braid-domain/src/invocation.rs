use crate::{item::ResultItem, job::JobKind};

/// What to ask one service for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
	Search { query: String },
	/// `since_ms` is already clamped to the lookback window.
	Feed { since_ms: i64 },
}
impl Invocation {
	pub fn kind(&self) -> JobKind {
		match self {
			Self::Search { .. } => JobKind::Search,
			Self::Feed { .. } => JobKind::Feed,
		}
	}
}

/// Result of one service call. Failures are values, never errors.
#[derive(Clone, Debug, PartialEq)]
pub enum InvocationOutcome {
	Success { items: Vec<ResultItem> },
	Failure { message: String },
}
impl InvocationOutcome {
	pub fn failure(message: impl Into<String>) -> Self {
		Self::Failure { message: message.into() }
	}
}
