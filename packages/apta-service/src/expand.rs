use std::collections::HashSet;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::RecommendService;

/// Original query plus at most three expansion angles.
pub(crate) const MAX_QUERIES: usize = 4;

const SYSTEM_PROMPT: &str = "\
You rewrite hiring queries to widen retrieval over an assessment catalog. \
Respond with a single JSON object and nothing else, using exactly these keys:
  \"skills\": a rewrite emphasising the concrete skills being hired for,
  \"roles\": a rewrite emphasising the job titles and roles involved,
  \"domain\": a rewrite emphasising the business domain and work context.
Each value is one short search phrase. Use null for an angle that adds nothing.";

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ExpansionOutput {
	skills: Option<String>,
	roles: Option<String>,
	domain: Option<String>,
}

impl RecommendService {
	/// The original query always comes back first; a failed expansion leaves
	/// it as the only entry.
	pub(crate) async fn expand_query(&self, query: &str) -> Vec<String> {
		let messages = build_messages(query);
		let raw = match self
			.providers
			.extractor
			.extract(&self.cfg.providers.extractor, &messages)
			.await
		{
			Ok(raw) => raw,
			Err(err) => {
				warn!(error = %err, "Query expansion failed; searching with the original query only.");

				return vec![query.to_string()];
			},
		};
		let queries = parse_expansion(raw, query);

		debug!(queries = queries.len(), "Expanded query.");

		queries
	}
}

fn build_messages(query: &str) -> Vec<Value> {
	vec![
		json!({ "role": "system", "content": SYSTEM_PROMPT }),
		json!({ "role": "user", "content": query }),
	]
}

pub(crate) fn parse_expansion(raw: Value, original: &str) -> Vec<String> {
	let mut queries = vec![original.to_string()];
	let mut seen: HashSet<String> = HashSet::from([original.to_lowercase()]);
	let Ok(parsed) = serde_json::from_value::<ExpansionOutput>(raw) else {
		warn!("Query expander returned an unusable shape.");

		return queries;
	};

	for variant in [parsed.skills, parsed.roles, parsed.domain].into_iter().flatten() {
		let variant = variant.trim();

		if variant.is_empty() || queries.len() >= MAX_QUERIES {
			continue;
		}
		if seen.insert(variant.to_lowercase()) {
			queries.push(variant.to_string());
		}
	}

	queries
}
