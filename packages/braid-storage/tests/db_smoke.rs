use serde_json::json;
use time::macros::datetime;
use uuid::Uuid;

use braid_config::Postgres;
use braid_domain::{
	account::{AccountProfile, AccountState},
	item::ResultItem,
	job::{JobKind, OutcomeKey},
};
use braid_storage::{Error, accounts, db::Db, outcomes, payloads};
use braid_testkit::TestDatabase;

async fn bootstrap(dsn: &str) -> Db {
	let cfg = Postgres { dsn: dsn.to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

fn key(job_id: Uuid, service_id: &str) -> OutcomeKey {
	OutcomeKey {
		job_id,
		provider_id: "com.example".to_string(),
		service_id: service_id.to_string(),
		account_id: "acct-1".to_string(),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BRAID_PG_DSN to run."]
async fn tables_exist_after_bootstrap() {
	let Some(base_dsn) = braid_testkit::env_dsn() else {
		eprintln!("Skipping tables_exist_after_bootstrap; set BRAID_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(test_db.dsn()).await;

	// Bootstrapping twice must be harmless.
	db.ensure_schema().await.expect("Failed to re-run schema.");

	for table in ["provider_accounts", "service_outcomes", "service_payloads"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Missing table {table}.");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BRAID_PG_DSN to run."]
async fn duplicate_outcome_is_rejected() {
	let Some(base_dsn) = braid_testkit::env_dsn() else {
		eprintln!("Skipping duplicate_outcome_is_rejected; set BRAID_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(test_db.dsn()).await;
	let key = key(Uuid::new_v4(), "mail");

	outcomes::insert_outcome(&db.pool, &key, JobKind::Search, true, false)
		.await
		.expect("First insert failed.");

	let err = outcomes::insert_outcome(&db.pool, &key, JobKind::Search, true, false)
		.await
		.expect_err("Duplicate insert should fail.");

	assert!(matches!(err, Error::DuplicateKey(_)), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BRAID_PG_DSN to run."]
async fn delivery_is_claimed_once_after_resolution() {
	let Some(base_dsn) = braid_testkit::env_dsn() else {
		eprintln!("Skipping delivery_is_claimed_once_after_resolution; set BRAID_PG_DSN to run.");

		return;
	};

	braid_testkit::with_test_db(&base_dsn, |test_db| {
		let dsn = test_db.dsn().to_string();

		async move {
			let db = bootstrap(&dsn).await;
			let job_id = Uuid::new_v4();
			let mail = key(job_id, "mail");
			let drive = key(job_id, "drive");
			let items = vec![ResultItem {
				provider_id: "com.example".to_string(),
				service_id: "mail".to_string(),
				timestamp: Some(1_760_000_000_000),
				icon_url: "https://example.com/icon.png".to_string(),
				details: json!({ "subject": "Quarterly report" }),
				url: None,
			}];

			outcomes::insert_outcome(&db.pool, &mail, JobKind::Feed, true, false)
				.await
				.expect("Insert failed.");
			outcomes::insert_outcome(&db.pool, &drive, JobKind::Feed, true, false)
				.await
				.expect("Insert failed.");

			assert!(
				!outcomes::mark_outcome_delivered(&db.pool, &mail).await.expect("Claim failed."),
				"Pending outcomes must not be claimable."
			);

			payloads::insert_payload(&db.pool, &mail, &items)
				.await
				.expect("Payload insert failed.");
			outcomes::update_outcome_state(&db.pool, &mail, false, None)
				.await
				.expect("Update failed.");
			outcomes::update_outcome_state(&db.pool, &drive, false, Some("Status code: 503"))
				.await
				.expect("Update failed.");

			assert!(outcomes::mark_outcome_delivered(&db.pool, &mail).await.expect("Claim failed."));
			assert!(!outcomes::mark_outcome_delivered(&db.pool, &mail).await.expect("Claim failed."));

			let listed = outcomes::list_outcomes_by_job(&db.pool, job_id).await.expect("List failed.");
			let services: Vec<_> =
				listed.iter().map(|outcome| outcome.key.service_id.as_str()).collect();

			assert_eq!(services, vec!["drive", "mail"]);
			assert_eq!(listed[0].error_message.as_deref(), Some("Status code: 503"));
			assert!(listed[1].delivered);
			assert_eq!(listed[1].kind, JobKind::Feed);

			let stored = payloads::get_payload(&db.pool, &mail).await.expect("Payload read failed.");

			assert_eq!(stored, Some(items));
			assert_eq!(
				payloads::get_payload(&db.pool, &drive).await.expect("Payload read failed."),
				None
			);

			Ok(())
		}
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BRAID_PG_DSN to run."]
async fn account_errors_are_recorded_and_cleared_on_relink() {
	let Some(base_dsn) = braid_testkit::env_dsn() else {
		eprintln!("Skipping account_errors_are_recorded_and_cleared_on_relink; set BRAID_PG_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(test_db.dsn()).await;
	let profile = AccountProfile {
		name: "Ada".to_string(),
		account_name: Some("ada@example.com".to_string()),
		image_url: None,
		service_ids: vec!["mail".to_string()],
	};
	let at = datetime!(2026-10-18 09:30 UTC);

	accounts::upsert_provider_account(&db.pool, "u1", "com.example", "acct-1", &profile)
		.await
		.expect("Upsert failed.");
	accounts::mark_account_error(&db.pool, "u1", "com.example", "acct-1", "Status code: 401", at)
		.await
		.expect("Mark error failed.");

	let listed = accounts::list_accounts_by_user(&db.pool, "u1").await.expect("List failed.");

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].state, AccountState::Error);
	assert_eq!(listed[0].last_error_at, Some(at));
	assert_eq!(listed[0].profile, profile);

	accounts::upsert_provider_account(&db.pool, "u1", "com.example", "acct-1", &profile)
		.await
		.expect("Relink failed.");

	let listed = accounts::list_accounts_by_user(&db.pool, "u1").await.expect("List failed.");

	assert_eq!(listed[0].state, AccountState::Active);
	assert_eq!(listed[0].last_error_message, None);

	let missing =
		accounts::mark_account_error(&db.pool, "u1", "com.example", "acct-9", "boom", at).await;

	assert!(matches!(missing, Err(Error::NotFound(_))));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
