use std::{collections::HashMap, time::Duration};

use axum::{
	Json, Router,
	extract::Query,
	http::{HeaderMap, StatusCode},
	routing::get,
};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use braid_domain::target::{ServiceEndpoint, Target};

async fn spawn_stub(app: Router) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub listener.");
	let addr = listener.local_addr().expect("Failed to read stub address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});

	format!("http://{addr}")
}

fn target(service_url: String, api_key: Option<&str>) -> Target {
	let mut default_headers = Map::new();

	default_headers.insert("x-braid-client".to_string(), Value::String("aggregator".to_string()));

	Target {
		user_id: "user-1".to_string(),
		account_id: "acct-1".to_string(),
		provider_id: "com.example".to_string(),
		service_id: "com.example.mail".to_string(),
		endpoint: ServiceEndpoint {
			service_url,
			api_key: api_key.map(str::to_string),
			default_headers,
		},
	}
}

async fn echo_search(
	headers: HeaderMap,
	Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
	Json(json!({
		"matches": [{
			"timestamp": 1_760_000_000_000_i64,
			"iconUrl": "https://example.com/icon.png",
			"details": {
				"query": params.get("q"),
				"user": params.get("braidUserId"),
				"account": params.get("accountId"),
				"auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
				"client": headers.get("x-braid-client").and_then(|v| v.to_str().ok()),
			},
		}]
	}))
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		braid_providers::auth_headers(Some("secret"), &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn omits_auth_header_without_key() {
	let headers = braid_providers::auth_headers(None, &Map::new()).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn search_sends_identity_and_credentials() {
	let base = spawn_stub(Router::new().route("/search", get(echo_search))).await;
	let items = braid_providers::service::search(
		&target(base, Some("k-123")),
		"quarterly report",
		Duration::from_secs(5),
	)
	.await
	.expect("Search failed.");

	assert_eq!(items.len(), 1);

	let details = &items[0].details;

	assert_eq!(details["query"], "quarterly report");
	assert_eq!(details["user"], "user-1");
	assert_eq!(details["account"], "acct-1");
	assert_eq!(details["auth"], "Bearer k-123");
	assert_eq!(details["client"], "aggregator");
	assert_eq!(items[0].service_id, "com.example.mail");
}

#[tokio::test]
async fn feed_passes_since_watermark() {
	let app = Router::new().route(
		"/feed",
		get(|Query(params): Query<HashMap<String, String>>| async move {
			let since: i64 = params.get("since").and_then(|raw| raw.parse().ok()).unwrap_or(-1);

			Json(json!({ "items": [{ "timestamp": since + 1, "iconUrl": "", "details": {} }] }))
		}),
	);
	let base = spawn_stub(app).await;
	let items =
		braid_providers::service::feed(&target(base, None), 1_000, Duration::from_secs(5))
			.await
			.expect("Feed failed.");

	assert_eq!(items[0].timestamp, Some(1_001));
}

#[tokio::test]
async fn non_success_status_reports_code_and_body() {
	let app = Router::new()
		.route("/search", get(|| async { (StatusCode::UNAUTHORIZED, "token expired") }));
	let base = spawn_stub(app).await;
	let err = braid_providers::service::search(&target(base, None), "q", Duration::from_secs(5))
		.await
		.expect_err("Expected a status failure.");

	assert_eq!(err.to_string(), "Status code: 401. token expired");
}

#[tokio::test]
async fn empty_body_reports_no_data() {
	let app = Router::new().route("/feed", get(|| async { "" }));
	let base = spawn_stub(app).await;
	let err = braid_providers::service::feed(&target(base, None), 0, Duration::from_secs(5))
		.await
		.expect_err("Expected an empty-body failure.");

	assert_eq!(err.to_string(), "No data returned from service.");
}

#[tokio::test]
async fn fetches_descriptor() {
	let app = Router::new().route(
		"/descriptor",
		get(|| async {
			Json(json!({
				"id": "com.example",
				"name": "Example",
				"logoSquareUrl": "https://example.com/logo.png",
				"authUrl": "https://example.com/auth",
				"services": [{
					"id": "com.example.mail",
					"name": "Mail",
					"logoSquareUrl": "https://example.com/mail.png",
					"serviceUrl": "https://example.com/mail"
				}]
			}))
		}),
	);
	let base = spawn_stub(app).await;
	let descriptor = braid_providers::descriptor::fetch_descriptor(
		&format!("{base}/descriptor"),
		Duration::from_secs(5),
	)
	.await
	.expect("Descriptor fetch failed.");

	assert_eq!(descriptor.id, "com.example");
	assert_eq!(
		descriptor.service("com.example.mail").map(|service| service.name.as_str()),
		Some("Mail")
	);
}
