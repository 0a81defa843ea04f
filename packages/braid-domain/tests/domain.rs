use serde_json::json;
use time::macros::datetime;

use braid_domain::{
	account::{AccountProfile, AccountState, LinkedAccount},
	descriptor::{ProviderDescriptor, ServiceDescriptor},
	item::ResultItem,
};

#[test]
fn result_item_omits_absent_optionals() {
	let item = ResultItem {
		provider_id: "com.hivepoint.google".to_string(),
		service_id: "com.hivepoint.google.gmail".to_string(),
		timestamp: None,
		icon_url: "https://example.com/gmail.png".to_string(),
		details: json!({ "subject": "Quarterly plan" }),
		url: None,
	};
	let value = serde_json::to_value(&item).expect("Failed to serialize item.");

	assert!(value.get("timestamp").is_none());
	assert!(value.get("url").is_none());
	assert_eq!(value["details"]["subject"], "Quarterly plan");

	let back: ResultItem = serde_json::from_value(value).expect("Failed to deserialize item.");

	assert_eq!(back, item);
}

#[test]
fn linked_account_serializes_timestamps_as_rfc3339() {
	let account = LinkedAccount {
		user_id: "u-1".to_string(),
		provider_id: "com.hivepoint.google".to_string(),
		account_id: "acct-1".to_string(),
		profile: AccountProfile {
			name: "Dana".to_string(),
			account_name: Some("dana@example.com".to_string()),
			image_url: None,
			service_ids: vec!["com.hivepoint.google.gmail".to_string()],
		},
		state: AccountState::Error,
		last_error_message: Some("Status code: 401".to_string()),
		last_error_at: Some(datetime!(2026-10-18 09:30 UTC)),
		last_updated: datetime!(2026-10-01 00:00 UTC),
	};
	let value = serde_json::to_value(&account).expect("Failed to serialize account.");

	assert_eq!(value["state"], "error");
	assert_eq!(value["last_error_at"], "2026-10-18T09:30:00Z");
	assert!(account.has_service("com.hivepoint.google.gmail"));
	assert!(!account.has_service("com.hivepoint.google.drive"));
}

#[test]
fn provider_descriptor_finds_services_by_id() {
	let descriptor = ProviderDescriptor {
		id: "com.hivepoint.google".to_string(),
		name: "Google".to_string(),
		logo_square_url: String::new(),
		auth_url: String::new(),
		services: vec![ServiceDescriptor {
			id: "com.hivepoint.google.drive".to_string(),
			name: "Drive".to_string(),
			logo_square_url: String::new(),
			service_url: "http://127.0.0.1:9001/drive".to_string(),
		}],
	};

	assert_eq!(
		descriptor.service("com.hivepoint.google.drive").map(|service| service.name.as_str()),
		Some("Drive")
	);
	assert!(descriptor.service("com.hivepoint.google.gmail").is_none());
}
