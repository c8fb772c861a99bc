use std::sync::Arc;

use apta_service::RecommendService;
use apta_storage::qdrant::QdrantCatalog;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RecommendService>,
}
impl AppState {
	/// An unreachable vector store does not block startup; the service comes
	/// up degraded and answers every query with an empty list.
	pub fn new(config: apta_config::Config) -> Self {
		let service = match QdrantCatalog::new(&config.storage.qdrant) {
			Ok(catalog) => RecommendService::new(config, catalog),
			Err(err) => {
				tracing::error!(error = %err, "Vector store unavailable; starting degraded.");

				RecommendService::degraded(config)
			},
		};

		Self { service: Arc::new(service) }
	}
}
