use std::{collections::HashSet, slice};

use tracing::{debug, warn};

use apta_domain::{CatalogDoc, QueryConstraints, name_match};

use crate::{CatalogStore, RecommendService, lexical::LexicalIndex};

/// Candidate pool keyed by catalog item id. The first channel to produce an
/// item wins; later channels cannot overwrite its document text, and the
/// insertion order is what downstream ranking falls back to on score ties.
pub(crate) struct CandidateSet {
	seen: HashSet<String>,
	docs: Vec<CatalogDoc>,
}

impl CandidateSet {
	pub(crate) fn new() -> Self {
		Self { seen: HashSet::new(), docs: Vec::new() }
	}

	pub(crate) fn insert(&mut self, doc: CatalogDoc) {
		if self.seen.insert(doc.item.id.clone()) {
			self.docs.push(doc);
		}
	}

	pub(crate) fn into_docs(self) -> Vec<CatalogDoc> {
		self.docs
	}
}

impl RecommendService {
	pub(crate) async fn semantic_channel(
		&self,
		catalog: &dyn CatalogStore,
		query: &str,
		constraints: &QueryConstraints,
		out: &mut CandidateSet,
	) {
		let owned = query.to_string();
		let mut vectors = match self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, slice::from_ref(&owned), true)
			.await
		{
			Ok(vectors) => vectors,
			Err(err) => {
				warn!(error = %err, "Query embedding failed; semantic channel skipped.");

				return;
			},
		};
		let Some(vector) = vectors.pop() else {
			warn!("Embedding provider returned no vectors; semantic channel skipped.");

			return;
		};
		let top_k = self.cfg.retrieval.retrieval_k;
		let mut docs = match catalog.search(&vector, top_k, constraints).await {
			Ok(docs) => docs,
			Err(err) => {
				warn!(error = %err, "Semantic search failed; semantic channel skipped.");

				return;
			},
		};

		// A seniority band can filter the whole catalog away; duration and
		// support constraints stay in force on the retry.
		if docs.is_empty() && let Some(band) = constraints.seniority {
			warn!(
				band = band.as_str(),
				"No semantic results under the seniority filter; retrying without it."
			);

			let relaxed = QueryConstraints { seniority: None, ..constraints.clone() };

			docs = match catalog.search(&vector, top_k, &relaxed).await {
				Ok(docs) => docs,
				Err(err) => {
					warn!(error = %err, "Relaxed semantic search failed.");

					Vec::new()
				},
			};
		}

		for doc in docs {
			out.insert(doc);
		}
	}
}

pub(crate) fn lexical_channel(
	index: &LexicalIndex,
	query: &str,
	top_k: u32,
	constraints: &QueryConstraints,
	out: &mut CandidateSet,
) {
	for (doc_index, _score) in index.bm25.search(query, top_k as usize) {
		let doc = &index.docs[doc_index];

		if !constraints.allows(&doc.item) {
			continue;
		}

		out.insert(doc.clone());
	}
}

/// Scans every catalog name against the raw user query. This pass runs
/// unfiltered so a named instrument survives even when the extracted
/// constraints would exclude it.
pub(crate) fn exact_name_pass(
	query: &str,
	extra_keywords: &[String],
	index: &LexicalIndex,
	out: &mut CandidateSet,
) {
	let mut matched = 0_usize;

	for doc in &index.docs {
		if name_match::name_matches(query, &doc.item.name, extra_keywords) {
			out.insert(doc.clone());
			matched += 1;
		}
	}

	debug!(matched, "Exact-name pass complete.");
}
