use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub matcher: Matcher,
	#[serde(default)]
	pub output: Output,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: ProviderConfig,
	pub extractor: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	/// Instruction prefix prepended when encoding search queries. Query and
	/// document embeddings are not generated identically.
	#[serde(default)]
	pub query_prefix: String,
	#[serde(default)]
	pub document_prefix: String,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	/// Candidates fetched per channel per expanded query, independent of the
	/// final result count.
	pub retrieval_k: u32,
	pub max_results: u32,
	pub max_query_chars: usize,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self { retrieval_k: 50, max_results: 10, max_query_chars: 1_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub keyword_boost_weight: f32,
	pub name_boost_weight: f32,
	pub seniority_penalty: f32,
	pub score_threshold: f32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			keyword_boost_weight: 3.0,
			name_boost_weight: 5.0,
			seniority_penalty: 3.0,
			score_threshold: -2.0,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Matcher {
	/// Extends the compiled-in high-value keyword list used by the exact-name
	/// recovery pass.
	pub extra_keywords: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Output {
	/// Optional JSON file mapping canonical catalog URLs to public URLs.
	pub redirects_path: Option<PathBuf>,
}
