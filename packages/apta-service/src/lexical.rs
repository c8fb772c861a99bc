use std::sync::Arc;

use tracing::{info, warn};

use apta_domain::{CatalogDoc, bm25::Bm25Index};

use crate::{CatalogStore, RecommendService};

/// In-memory lexical view of the catalog. Built once per process from a full
/// scroll of the vector store and shared across requests.
pub(crate) struct LexicalIndex {
	pub(crate) docs: Vec<CatalogDoc>,
	pub(crate) bm25: Bm25Index,
}

impl LexicalIndex {
	pub(crate) fn build(docs: Vec<CatalogDoc>) -> Self {
		let texts: Vec<&str> = docs.iter().map(|doc| doc.text.as_str()).collect();
		let bm25 = Bm25Index::build(&texts);

		Self { docs, bm25 }
	}
}

impl RecommendService {
	/// A failed build is not cached, so the next request retries the scroll.
	pub(crate) async fn lexical_index(
		&self,
		catalog: &dyn CatalogStore,
	) -> Option<Arc<LexicalIndex>> {
		let result = self
			.lexical
			.get_or_try_init(|| async {
				let docs = catalog.get_all().await?;

				info!(documents = docs.len(), "Built lexical catalog index.");

				Ok::<_, color_eyre::Report>(Arc::new(LexicalIndex::build(docs)))
			})
			.await;

		match result {
			Ok(index) => Some(index.clone()),
			Err(err) => {
				warn!(error = %err, "Lexical index build failed; lexical and name channels skipped.");

				None
			},
		}
	}
}
