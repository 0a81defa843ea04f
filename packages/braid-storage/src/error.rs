const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(sqlx::Error),
	#[error("Duplicate key: {0}")]
	DuplicateKey(String),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		if let Some(db_err) = err.as_database_error()
			&& db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
		{
			return Self::DuplicateKey(db_err.message().to_string());
		}

		Self::Sqlx(err)
	}
}
