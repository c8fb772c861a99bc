use serde_json::{Value, json};
use tracing::{info, warn};

use apta_domain::{QueryConstraints, SeniorityBand};

use crate::RecommendService;

const SYSTEM_PROMPT: &str = "\
You extract hard constraints from hiring queries. Respond with a single JSON \
object and nothing else, using exactly these keys:
  \"max_duration_minutes\": integer or null,
  \"requires_remote\": true, false or null,
  \"requires_adaptive\": true, false or null,
  \"job_level\": \"Entry_Level\", \"Manager_Senior\" or null.
Use null whenever the query does not state the constraint explicitly.";

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ExtractorOutput {
	max_duration_minutes: Option<u32>,
	requires_remote: Option<bool>,
	requires_adaptive: Option<bool>,
	job_level: Option<String>,
}

impl RecommendService {
	/// Extraction failures never fail the request; the pipeline proceeds
	/// unconstrained instead.
	pub(crate) async fn extract_constraints(&self, query: &str) -> QueryConstraints {
		let messages = build_messages(query);
		let raw = match self
			.providers
			.extractor
			.extract(&self.cfg.providers.extractor, &messages)
			.await
		{
			Ok(raw) => raw,
			Err(err) => {
				warn!(error = %err, "Constraint extraction failed; proceeding unconstrained.");

				return QueryConstraints::default();
			},
		};
		let constraints = parse_constraints(raw);

		if !constraints.is_empty() {
			info!(?constraints, "Extracted query constraints.");
		}

		constraints
	}
}

fn build_messages(query: &str) -> Vec<Value> {
	vec![
		json!({ "role": "system", "content": SYSTEM_PROMPT }),
		json!({ "role": "user", "content": query }),
	]
}

pub(crate) fn parse_constraints(raw: Value) -> QueryConstraints {
	let parsed: ExtractorOutput = match serde_json::from_value(raw) {
		Ok(parsed) => parsed,
		Err(err) => {
			warn!(error = %err, "Constraint extractor returned an unusable shape.");

			return QueryConstraints::default();
		},
	};

	QueryConstraints {
		max_duration_minutes: parsed.max_duration_minutes,
		requires_remote: parsed.requires_remote,
		requires_adaptive: parsed.requires_adaptive,
		seniority: parsed.job_level.as_deref().and_then(SeniorityBand::parse),
	}
}
