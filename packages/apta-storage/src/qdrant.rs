use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, CountPointsBuilder, Filter, PointId, Query, QueryPointsBuilder, Range,
	ScrollPointsBuilder, Value, value::Kind,
};
use tracing::warn;

use apta_domain::{CatalogDoc, CatalogItem, QueryConstraints, SeniorityBand};

use crate::Result;

const SCROLL_BATCH: u32 = 256;

/// Qdrant-backed catalog of pre-embedded assessment documents. The
/// collection is written by the offline ingestion step and read-only here.
pub struct QdrantCatalog {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}

impl QdrantCatalog {
	pub fn new(cfg: &apta_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Nearest-neighbor search with the constraints translated into native
	/// filter predicates. Points with malformed payloads are skipped with a
	/// warning rather than propagated.
	pub async fn search(
		&self,
		vector: &[f32],
		top_k: u32,
		constraints: &QueryConstraints,
	) -> Result<Vec<CatalogDoc>> {
		if vector.len() != self.vector_dim as usize {
			return Err(crate::Error::InvalidArgument(format!(
				"Query vector has {} dimensions, collection expects {}.",
				vector.len(),
				self.vector_dim,
			)));
		}

		let mut query = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.limit(top_k as u64)
			.with_payload(true);
		if let Some(filter) = constraint_filter(constraints) {
			query = query.filter(filter);
		}

		let response = self.client.query(query).await?;

		Ok(response.result.iter().filter_map(|point| decode_payload(&point.payload)).collect())
	}

	/// Full catalog snapshot, used once to bootstrap the lexical index.
	pub async fn get_all(&self) -> Result<Vec<CatalogDoc>> {
		let mut out = Vec::new();
		let mut offset: Option<PointId> = None;

		loop {
			let mut scroll = ScrollPointsBuilder::new(self.collection.clone())
				.limit(SCROLL_BATCH)
				.with_payload(true);
			if let Some(offset) = offset.take() {
				scroll = scroll.offset(offset);
			}

			let response = self.client.scroll(scroll).await?;

			out.extend(response.result.iter().filter_map(|point| decode_payload(&point.payload)));

			match response.next_page_offset {
				Some(next) => offset = Some(next),
				None => break,
			}
		}

		Ok(out)
	}

	pub async fn count(&self) -> Result<u64> {
		let response =
			self.client.count(CountPointsBuilder::new(self.collection.clone()).exact(true)).await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}
}

/// Builds the native filter for the supported constraints: duration ceiling,
/// remote/adaptive requirements, and the seniority band. Returns `None` when
/// the constraints are empty so the search runs unfiltered.
fn constraint_filter(constraints: &QueryConstraints) -> Option<Filter> {
	let mut must = Vec::new();

	if let Some(band) = constraints.seniority {
		must.push(Condition::matches("job_level", band.as_str().to_string()));
	}
	if let Some(max) = constraints.max_duration_minutes {
		must.push(Condition::range(
			"duration",
			Range { lte: Some(max as f64), ..Range::default() },
		));
	}
	if constraints.requires_remote == Some(true) {
		must.push(Condition::matches("remote_support", true));
	}
	if constraints.requires_adaptive == Some(true) {
		must.push(Condition::matches("adaptive_support", true));
	}

	if must.is_empty() { None } else { Some(Filter::must(must)) }
}

/// Decodes a point payload into a validated catalog document. Ingestion is
/// the trust boundary: anything missing its identity, url, or document text
/// is rejected here instead of leaking into scoring arithmetic.
fn decode_payload(payload: &HashMap<String, Value>) -> Option<CatalogDoc> {
	let url = payload_str(payload, "url")?;
	let Some(name) = payload_str(payload, "name") else {
		warn!(url, "Catalog point missing name; skipped.");
		return None;
	};
	let Some(text) = payload_str(payload, "document") else {
		warn!(url, "Catalog point missing document text; skipped.");
		return None;
	};
	let id = payload_str(payload, "id").unwrap_or_else(|| url.clone());
	let duration_minutes = match payload_u32(payload, "duration") {
		Some(value) => value,
		None => {
			warn!(url, "Catalog point has a non-numeric duration; skipped.");
			return None;
		},
	};
	let seniority = payload_str(payload, "job_level")
		.as_deref()
		.and_then(SeniorityBand::parse)
		.unwrap_or(SeniorityBand::General);
	let item = CatalogItem {
		id,
		name,
		description: payload_str(payload, "description").unwrap_or_default(),
		duration_minutes,
		test_type: payload_str(payload, "test_type")
			.unwrap_or_else(|| "General".to_string()),
		remote_support: payload_flag(payload, "remote_support"),
		adaptive_support: payload_flag(payload, "adaptive_support"),
		seniority,
		url,
	};

	Some(CatalogDoc { item, text })
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;
	match &value.kind {
		Some(Kind::StringValue(text)) if !text.is_empty() => Some(text.clone()),
		_ => None,
	}
}

fn payload_u32(payload: &HashMap<String, Value>, key: &str) -> Option<u32> {
	let value = payload.get(key)?;
	match &value.kind {
		Some(Kind::IntegerValue(value)) => u32::try_from(*value).ok(),
		Some(Kind::DoubleValue(value)) if value.fract() == 0.0 && *value >= 0.0 => {
			u32::try_from(*value as i64).ok()
		},
		_ => None,
	}
}

/// Support flags arrive either as native booleans or as the legacy
/// `"Yes"`/`"No"` strings, depending on the ingestion vintage.
fn payload_flag(payload: &HashMap<String, Value>, key: &str) -> bool {
	let Some(value) = payload.get(key) else {
		return false;
	};
	match &value.kind {
		Some(Kind::BoolValue(flag)) => *flag,
		Some(Kind::StringValue(text)) => text.eq_ignore_ascii_case("yes"),
		_ => false,
	}
}
