use tracing::info;

use crate::{RecommendService, ServiceError, ServiceResult, rerank, retrieve, select};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecommendRequest {
	pub query: String,
	pub n_results: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Recommendation {
	pub name: String,
	pub url: String,
	#[serde(with = "crate::yes_no")]
	pub remote_support: bool,
	#[serde(with = "crate::yes_no")]
	pub adaptive_support: bool,
	pub description: String,
	pub duration: u32,
	pub test_type: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecommendResponse {
	pub recommended_assessments: Vec<Recommendation>,
}

impl RecommendService {
	pub async fn recommend(&self, req: RecommendRequest) -> ServiceResult<RecommendResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Query must not be empty.".to_string(),
			});
		}

		let n_results = req
			.n_results
			.unwrap_or(self.cfg.retrieval.max_results)
			.clamp(1, self.cfg.retrieval.max_results) as usize;
		let Some(catalog) = self.catalog.as_ref() else {
			tracing::error!("Catalog store is unavailable; returning no recommendations.");

			return Ok(RecommendResponse { recommended_assessments: Vec::new() });
		};
		let constraints = self.extract_constraints(query).await;
		let queries = self.expand_query(query).await;
		let lexical = self.lexical_index(catalog.as_ref()).await;
		let mut candidates = retrieve::CandidateSet::new();

		if let Some(index) = lexical.as_deref() {
			retrieve::exact_name_pass(query, &self.cfg.matcher.extra_keywords, index, &mut candidates);
		}

		for search_query in &queries {
			let truncated = truncate_query(search_query, self.cfg.retrieval.max_query_chars);

			self.semantic_channel(catalog.as_ref(), truncated, &constraints, &mut candidates).await;

			if let Some(index) = lexical.as_deref() {
				retrieve::lexical_channel(
					index,
					truncated,
					self.cfg.retrieval.retrieval_k,
					&constraints,
					&mut candidates,
				);
			}
		}

		let candidates = candidates.into_docs();

		if candidates.is_empty() {
			info!(%query, "No candidates survived retrieval.");

			return Ok(RecommendResponse { recommended_assessments: Vec::new() });
		}

		info!(candidates = candidates.len(), queries = queries.len(), "Gathered candidate pool.");

		let scores = self.rerank_scores(query, &candidates).await;
		let ranked = rerank::rank(&self.cfg.ranking, query, &constraints, candidates, scores);
		let selected = select::select(&self.cfg.ranking, &self.redirects, ranked, n_results);

		info!(selected = selected.len(), "Recommendation complete.");

		Ok(RecommendResponse { recommended_assessments: selected })
	}
}

/// Truncates on a char boundary so multi-byte queries cannot split a
/// code point.
pub(crate) fn truncate_query(query: &str, max_chars: usize) -> &str {
	match query.char_indices().nth(max_chars) {
		Some((byte_index, _)) => &query[..byte_index],
		None => query,
	}
}
