use std::{sync::Arc, time::Duration};

use braid_service::{
	AggregationService, ProviderCatalog, accounts::PgAccountRegistry, store::PgJobStore,
};
use braid_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AggregationService>,
}
impl AppState {
	pub async fn new(config: braid_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let descriptor_timeout = Duration::from_millis(config.aggregation.descriptor_timeout_ms);
		let catalog = Arc::new(ProviderCatalog::load(&config.providers, descriptor_timeout).await?);

		tracing::info!(providers = catalog.providers().len(), "Provider catalog loaded.");

		let store = Arc::new(PgJobStore::new(db.pool.clone()));
		let accounts = Arc::new(PgAccountRegistry::new(db.pool.clone(), catalog.clone()));
		let service = AggregationService::new(config.aggregation, store, accounts, catalog);

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: AggregationService) -> Self {
		Self { service: Arc::new(service) }
	}
}
