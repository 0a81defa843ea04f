use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	pub id: String,
	pub name: String,
	pub logo_square_url: String,
	pub auth_url: String,
	pub services: Vec<ServiceDescriptor>,
}
impl ProviderDescriptor {
	pub fn service(&self, service_id: &str) -> Option<&ServiceDescriptor> {
		self.services.iter().find(|service| service.id == service_id)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
	pub id: String,
	pub name: String,
	pub logo_square_url: String,
	/// Base URL; `/search` and `/feed` are appended per call.
	pub service_url: String,
}
