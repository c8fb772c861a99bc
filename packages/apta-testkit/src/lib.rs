//! Scripted providers and an in-memory catalog store for exercising the
//! recommendation pipeline without network services.

use std::collections::HashMap;

use serde_json::Value;

use apta_config::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Matcher, Output, ProviderConfig, Providers,
	Qdrant, Ranking, Retrieval, Service, Storage,
};
use apta_domain::{CatalogDoc, CatalogItem, QueryConstraints, SeniorityBand};
use apta_service::{
	BoxFuture, CatalogStore, EmbeddingProvider, ExtractorProvider, RerankProvider,
};

/// Always returns the same vector for every input text.
pub struct StaticEmbedding {
	pub vector: Vec<f32>,
}

/// Scores documents by exact text lookup; unknown texts score zero.
pub struct StaticRerank {
	pub scores: HashMap<String, f32>,
}

/// Returns the same JSON payload for every extraction call.
pub struct StaticExtractor {
	pub payload: Value,
}

/// Fails every provider call, for exercising fallback paths.
pub struct FailingProvider;

/// In-memory catalog. `semantic_order` scripts which item ids the semantic
/// channel returns and in what order; the native filter semantics of the
/// vector store still apply on top, including exact band matching.
pub struct StaticCatalog {
	pub docs: Vec<CatalogDoc>,
	pub semantic_order: Vec<String>,
}

/// Fails every store call, for exercising degraded retrieval.
pub struct FailingCatalog;

impl EmbeddingProvider for StaticEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
		_is_query: bool,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(vec![self.vector.clone(); texts.len()]) })
	}
}

impl RerankProvider for StaticRerank {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move {
			Ok(docs.iter().map(|doc| self.scores.get(doc).copied().unwrap_or(0.0)).collect())
		})
	}
}

impl ExtractorProvider for StaticExtractor {
	fn extract<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move { Ok(self.payload.clone()) })
	}
}

impl EmbeddingProvider for FailingProvider {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_texts: &'a [String],
		_is_query: bool,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("embedding provider down")) })
	}
}

impl RerankProvider for FailingProvider {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_query: &'a str,
		_docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("rerank provider down")) })
	}
}

impl ExtractorProvider for FailingProvider {
	fn extract<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("extractor provider down")) })
	}
}

impl StaticCatalog {
	pub fn new(docs: Vec<CatalogDoc>) -> Self {
		let semantic_order = docs.iter().map(|doc| doc.item.id.clone()).collect();

		Self { docs, semantic_order }
	}

	pub fn with_semantic_order(docs: Vec<CatalogDoc>, semantic_order: Vec<String>) -> Self {
		Self { docs, semantic_order }
	}

	fn find(&self, id: &str) -> Option<&CatalogDoc> {
		self.docs.iter().find(|doc| doc.item.id == id)
	}
}

/// Mirrors the vector store's native filter: duration is a ceiling, support
/// flags only filter when required, and any stated band must match exactly.
fn native_filter_allows(constraints: &QueryConstraints, item: &CatalogItem) -> bool {
	if let Some(max) = constraints.max_duration_minutes
		&& item.duration_minutes > max
	{
		return false;
	}
	if constraints.requires_remote == Some(true) && !item.remote_support {
		return false;
	}
	if constraints.requires_adaptive == Some(true) && !item.adaptive_support {
		return false;
	}
	if let Some(band) = constraints.seniority
		&& item.seniority != band
	{
		return false;
	}

	true
}

impl CatalogStore for StaticCatalog {
	fn search<'a>(
		&'a self,
		_vector: &'a [f32],
		top_k: u32,
		constraints: &'a QueryConstraints,
	) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>> {
		Box::pin(async move {
			Ok(self
				.semantic_order
				.iter()
				.filter_map(|id| self.find(id))
				.filter(|doc| native_filter_allows(constraints, &doc.item))
				.take(top_k as usize)
				.cloned()
				.collect())
		})
	}

	fn get_all<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>> {
		Box::pin(async move { Ok(self.docs.clone()) })
	}

	fn count<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<u64>> {
		Box::pin(async move { Ok(self.docs.len() as u64) })
	}
}

impl CatalogStore for FailingCatalog {
	fn search<'a>(
		&'a self,
		_vector: &'a [f32],
		_top_k: u32,
		_constraints: &'a QueryConstraints,
	) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("catalog store down")) })
	}

	fn get_all<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<CatalogDoc>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("catalog store down")) })
	}

	fn count<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<u64>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("catalog store down")) })
	}
}

pub fn catalog_doc(id: &str, name: &str, text: &str) -> CatalogDoc {
	CatalogDoc {
		item: CatalogItem {
			id: id.to_string(),
			name: name.to_string(),
			description: text.to_string(),
			duration_minutes: 30,
			test_type: "Knowledge & Skills".to_string(),
			remote_support: true,
			adaptive_support: false,
			seniority: SeniorityBand::General,
			url: format!("https://example.com/catalog/{id}"),
		},
		text: text.to_string(),
	}
}

pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant {
				url: "http://localhost:6334".to_string(),
				collection: "catalog".to_string(),
				vector_dim: 3,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/".to_string(),
				model: "m".to_string(),
				dimensions: 3,
				timeout_ms: 1_000,
				query_prefix: String::new(),
				document_prefix: String::new(),
				default_headers: Default::default(),
			},
			rerank: ProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/".to_string(),
				model: "m".to_string(),
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
			extractor: LlmProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/".to_string(),
				model: "m".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
		},
		retrieval: Retrieval::default(),
		ranking: Ranking::default(),
		matcher: Matcher::default(),
		output: Output::default(),
	}
}
