use tracing::warn;

use apta_config::Ranking;
use apta_domain::{
	CatalogDoc, QueryConstraints,
	text::{overlap_ratio, token_set},
};

use crate::RecommendService;

#[derive(Debug)]
pub(crate) struct RankedCandidate {
	pub(crate) doc: CatalogDoc,
	pub(crate) final_score: f32,
}

impl RecommendService {
	/// One oracle call over the whole pool. An unavailable oracle keeps every
	/// score at zero so ordering rests on the boost terms alone.
	pub(crate) async fn rerank_scores(&self, query: &str, docs: &[CatalogDoc]) -> Vec<f32> {
		let texts: Vec<String> = docs.iter().map(|doc| doc.text.clone()).collect();

		match self.providers.rerank.rerank(&self.cfg.providers.rerank, query, &texts).await {
			Ok(scores) if scores.len() == docs.len() => scores,
			Ok(scores) => {
				warn!(
					expected = docs.len(),
					received = scores.len(),
					"Rerank oracle returned a mismatched score count; ranking on boosts only."
				);

				vec![0.0; docs.len()]
			},
			Err(err) => {
				warn!(error = %err, "Rerank oracle unavailable; ranking on boosts only.");

				vec![0.0; docs.len()]
			},
		}
	}
}

/// Applies boosts and the seniority penalty, then sorts descending. The sort
/// is stable, so ties keep the candidate pool's retrieval order.
pub(crate) fn rank(
	cfg: &Ranking,
	query: &str,
	constraints: &QueryConstraints,
	docs: Vec<CatalogDoc>,
	scores: Vec<f32>,
) -> Vec<RankedCandidate> {
	let query_tokens = token_set(query);
	let mut ranked: Vec<RankedCandidate> = docs
		.into_iter()
		.zip(scores)
		.map(|(doc, oracle_score)| {
			let keyword_boost = overlap_ratio(&query_tokens, &token_set(&doc.text))
				* cfg.keyword_boost_weight;
			let name_boost =
				overlap_ratio(&query_tokens, &token_set(&doc.item.name)) * cfg.name_boost_weight;
			let penalty = match constraints.seniority {
				Some(band) if band.conflicts_with(doc.item.seniority) => -cfg.seniority_penalty,
				_ => 0.0,
			};
			let final_score = oracle_score + keyword_boost + name_boost + penalty;

			RankedCandidate { doc, final_score }
		})
		.collect();

	ranked.sort_by(|a, b| {
		b.final_score.partial_cmp(&a.final_score).unwrap_or(std::cmp::Ordering::Equal)
	});

	ranked
}

#[cfg(test)]
mod tests {
	use apta_domain::{CatalogItem, SeniorityBand};

	use super::*;

	fn ranking() -> Ranking {
		Ranking {
			keyword_boost_weight: 3.0,
			name_boost_weight: 5.0,
			seniority_penalty: 3.0,
			score_threshold: -2.0,
		}
	}

	fn doc(id: &str, name: &str, text: &str, seniority: SeniorityBand) -> CatalogDoc {
		CatalogDoc {
			item: CatalogItem {
				id: id.to_string(),
				name: name.to_string(),
				description: text.to_string(),
				duration_minutes: 30,
				test_type: "Knowledge & Skills".to_string(),
				remote_support: true,
				adaptive_support: false,
				seniority,
				url: format!("https://example.com/{id}"),
			},
			text: text.to_string(),
		}
	}

	#[test]
	fn rank_adds_keyword_and_name_boosts() {
		let docs = vec![doc("a", "python programming", "python programming for developers", SeniorityBand::General)];
		let ranked =
			rank(&ranking(), "python developer", &QueryConstraints::default(), docs, vec![1.0]);

		// keyword boost: 2/2 tokens in text = 3.0; name boost: 1/2 in name = 2.5.
		assert!((ranked[0].final_score - 6.5).abs() < 1e-6);
	}

	#[test]
	fn rank_applies_seniority_penalty_exactly_once() {
		let constraints = QueryConstraints {
			seniority: Some(SeniorityBand::EntryLevel),
			..QueryConstraints::default()
		};
		let docs = vec![
			doc("a", "x", "y", SeniorityBand::ManagerSenior),
			doc("b", "x", "y", SeniorityBand::General),
		];
		let unconstrained = rank(
			&ranking(),
			"query words",
			&QueryConstraints::default(),
			docs.clone(),
			vec![0.0, 0.0],
		);
		let constrained = rank(&ranking(), "query words", &constraints, docs, vec![0.0, 0.0]);
		let score_of = |ranked: &[RankedCandidate], id: &str| {
			ranked.iter().find(|c| c.doc.item.id == id).map(|c| c.final_score).unwrap()
		};

		let penalized_delta = score_of(&unconstrained, "a") - score_of(&constrained, "a");
		let general_delta = score_of(&unconstrained, "b") - score_of(&constrained, "b");

		assert!((penalized_delta - 3.0).abs() < 1e-6);
		assert!(general_delta.abs() < 1e-6);
	}

	#[test]
	fn rank_ties_keep_retrieval_order() {
		let docs = vec![
			doc("first", "x", "y", SeniorityBand::General),
			doc("second", "x", "y", SeniorityBand::General),
		];
		let ranked =
			rank(&ranking(), "unrelated query", &QueryConstraints::default(), docs, vec![
				0.5, 0.5,
			]);

		assert_eq!(ranked[0].doc.item.id, "first");
		assert_eq!(ranked[1].doc.item.id, "second");
	}

	#[test]
	fn rank_sorts_descending_by_final_score() {
		let docs = vec![
			doc("low", "x", "y", SeniorityBand::General),
			doc("high", "x", "y", SeniorityBand::General),
		];
		let ranked =
			rank(&ranking(), "unrelated query", &QueryConstraints::default(), docs, vec![
				0.1, 2.0,
			]);

		assert_eq!(ranked[0].doc.item.id, "high");
	}
}
