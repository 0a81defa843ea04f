pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<braid_storage::Error> for Error {
	fn from(err: braid_storage::Error) -> Self {
		match err {
			braid_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			braid_storage::Error::DuplicateKey(message) => Self::Conflict { message },
			braid_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			braid_storage::Error::NotFound(message) => Self::NotFound { message },
			braid_storage::Error::SerdeJson(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<braid_providers::Error> for Error {
	fn from(err: braid_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
