use axum::{
	Json, Router,
	extract::{Query, State, rejection::QueryRejection},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use braid_domain::{RequestContext, job::JobKind};
use braid_service::{Error as ServiceError, PollResult, ProviderListing, StartResult};

use crate::state::AppState;

/// Set by the authenticating front end on every request.
pub const USER_ID_HEADER: &str = "x-braid-user-id";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/services", get(list_services))
		.route("/v1/search", get(start_search))
		.route("/v1/search/poll", get(poll_search))
		.route("/v1/feed", get(start_feed))
		.route("/v1/feed/poll", get(poll_feed))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	#[serde(default)]
	q: String,
}

#[derive(Debug, Deserialize)]
struct FeedParams {
	/// Milliseconds since the Unix epoch.
	since: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PollParams {
	job_id: Uuid,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_services(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<Vec<ProviderListing>>, ApiError> {
	let ctx = request_context(&headers)?;
	let response = state.service.list_services(&ctx, &ctx.user_id).await?;

	Ok(Json(response))
}

async fn start_search(
	State(state): State<AppState>,
	headers: HeaderMap,
	params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<StartResult>, ApiError> {
	let ctx = request_context(&headers)?;
	let Query(params) = params.map_err(query_error)?;
	let response = state.service.start_search(&ctx, &ctx.user_id, &params.q).await?;

	Ok(Json(response))
}

async fn poll_search(
	State(state): State<AppState>,
	headers: HeaderMap,
	params: Result<Query<PollParams>, QueryRejection>,
) -> Result<Json<PollResult>, ApiError> {
	let ctx = request_context(&headers)?;
	let Query(params) = params.map_err(query_error)?;
	let response = state.service.poll_kind(&ctx, params.job_id, JobKind::Search).await?;

	Ok(Json(response))
}

async fn start_feed(
	State(state): State<AppState>,
	headers: HeaderMap,
	params: Result<Query<FeedParams>, QueryRejection>,
) -> Result<Json<StartResult>, ApiError> {
	let ctx = request_context(&headers)?;
	let Query(params) = params.map_err(query_error)?;
	let response = state.service.start_feed(&ctx, &ctx.user_id, params.since).await?;

	Ok(Json(response))
}

async fn poll_feed(
	State(state): State<AppState>,
	headers: HeaderMap,
	params: Result<Query<PollParams>, QueryRejection>,
) -> Result<Json<PollResult>, ApiError> {
	let ctx = request_context(&headers)?;
	let Query(params) = params.map_err(query_error)?;
	let response = state.service.poll_kind(&ctx, params.job_id, JobKind::Feed).await?;

	Ok(Json(response))
}

fn request_context(headers: &HeaderMap) -> Result<RequestContext, ApiError> {
	let user_id = headers
		.get(USER_ID_HEADER)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.ok_or_else(|| {
			json_error(
				StatusCode::UNAUTHORIZED,
				"MISSING_USER",
				format!("{USER_ID_HEADER} header is required."),
				None,
			)
		})?;

	Ok(RequestContext::new(user_id))
}

fn query_error(err: QueryRejection) -> ApiError {
	json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Provider failure.");

				json_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message, None)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Internal storage error.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
