pub mod constraints;
pub mod expand;
pub mod recommend;
pub mod yes_no;

mod lexical;
mod redirects;
mod rerank;
mod retrieve;
mod select;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use tokio::sync::OnceCell;

use apta_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, ProviderConfig};
use apta_domain::{CatalogDoc, QueryConstraints};
use apta_providers::{embedding, extractor, rerank as rerank_oracle};
use apta_storage::qdrant::QdrantCatalog;
pub use recommend::{RecommendRequest, RecommendResponse, Recommendation};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
		is_query: bool,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

pub trait ExtractorProvider
where
	Self: Send + Sync,
{
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

pub trait CatalogStore
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
		constraints: &'a QueryConstraints,
	) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>>;

	fn get_all<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>>;

	fn count<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<u64>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Provider { message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
	pub extractor: Arc<dyn ExtractorProvider>,
}

pub struct RecommendService {
	pub cfg: Config,
	catalog: Option<Arc<dyn CatalogStore>>,
	pub providers: Providers,
	lexical: OnceCell<Arc<lexical::LexicalIndex>>,
	redirects: HashMap<String, String>,
}

struct DefaultProviders;

struct QdrantBackedStore(QdrantCatalog);

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
		is_query: bool,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts, is_query))
	}
}

impl RerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(rerank_oracle::rerank(cfg, query, docs))
	}
}

impl ExtractorProvider for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(extractor::extract(cfg, messages))
	}
}

impl CatalogStore for QdrantBackedStore {
	fn search<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
		constraints: &'a QueryConstraints,
	) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>> {
		Box::pin(async move { Ok(self.0.search(vector, top_k, constraints).await?) })
	}

	fn get_all<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>> {
		Box::pin(async move { Ok(self.0.get_all().await?) })
	}

	fn count<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<u64>> {
		Box::pin(async move { Ok(self.0.count().await?) })
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		rerank: Arc<dyn RerankProvider>,
		extractor: Arc<dyn ExtractorProvider>,
	) -> Self {
		Self { embedding, rerank, extractor }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), rerank: provider.clone(), extractor: provider }
	}
}

impl RecommendService {
	pub fn new(cfg: Config, catalog: QdrantCatalog) -> Self {
		let redirects = redirects::load(cfg.output.redirects_path.as_deref());

		Self {
			cfg,
			catalog: Some(Arc::new(QdrantBackedStore(catalog))),
			providers: Providers::default(),
			lexical: OnceCell::new(),
			redirects,
		}
	}

	pub fn with_store(cfg: Config, catalog: Arc<dyn CatalogStore>, providers: Providers) -> Self {
		let redirects = redirects::load(cfg.output.redirects_path.as_deref());

		Self { cfg, catalog: Some(catalog), providers, lexical: OnceCell::new(), redirects }
	}

	/// Serve without a catalog store. Every request resolves to an empty
	/// recommendation list, which keeps the API reachable while the vector
	/// store is down.
	pub fn degraded(cfg: Config) -> Self {
		let redirects = redirects::load(cfg.output.redirects_path.as_deref());

		Self {
			cfg,
			catalog: None,
			providers: Providers::default(),
			lexical: OnceCell::new(),
			redirects,
		}
	}

	pub async fn catalog_count(&self) -> Option<u64> {
		let catalog = self.catalog.as_ref()?;

		match catalog.count().await {
			Ok(count) => Some(count),
			Err(err) => {
				tracing::warn!(error = %err, "Catalog count failed.");

				None
			},
		}
	}
}
