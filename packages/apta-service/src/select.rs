use std::collections::HashMap;

use apta_config::Ranking;

use crate::{Recommendation, rerank::RankedCandidate};

/// Threshold, truncation and URL remapping. URLs absent from the redirect
/// table pass through unchanged.
pub(crate) fn select(
	cfg: &Ranking,
	redirects: &HashMap<String, String>,
	ranked: Vec<RankedCandidate>,
	n_results: usize,
) -> Vec<Recommendation> {
	ranked
		.into_iter()
		.filter(|candidate| candidate.final_score >= cfg.score_threshold)
		.take(n_results)
		.map(|candidate| {
			let item = candidate.doc.item;
			let url = redirects.get(&item.url).cloned().unwrap_or(item.url);

			Recommendation {
				name: item.name,
				url,
				remote_support: item.remote_support,
				adaptive_support: item.adaptive_support,
				description: item.description,
				duration: item.duration_minutes,
				test_type: vec![item.test_type],
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use apta_domain::{CatalogDoc, CatalogItem, SeniorityBand};

	use super::*;

	fn ranking(score_threshold: f32) -> Ranking {
		Ranking {
			keyword_boost_weight: 3.0,
			name_boost_weight: 5.0,
			seniority_penalty: 3.0,
			score_threshold,
		}
	}

	fn candidate(id: &str, final_score: f32) -> RankedCandidate {
		RankedCandidate {
			doc: CatalogDoc {
				item: CatalogItem {
					id: id.to_string(),
					name: id.to_string(),
					description: "desc".to_string(),
					duration_minutes: 30,
					test_type: "Knowledge & Skills".to_string(),
					remote_support: true,
					adaptive_support: false,
					seniority: SeniorityBand::General,
					url: format!("https://example.com/{id}"),
				},
				text: "desc".to_string(),
			},
			final_score,
		}
	}

	#[test]
	fn select_drops_below_threshold() {
		let ranked = vec![candidate("a", 1.0), candidate("b", -2.5)];
		let selected = select(&ranking(-2.0), &HashMap::new(), ranked, 10);

		assert_eq!(selected.len(), 1);
		assert_eq!(selected[0].name, "a");
	}

	#[test]
	fn select_keeps_scores_equal_to_threshold() {
		let ranked = vec![candidate("a", -2.0)];
		let selected = select(&ranking(-2.0), &HashMap::new(), ranked, 10);

		assert_eq!(selected.len(), 1);
	}

	#[test]
	fn raising_the_threshold_never_grows_the_result() {
		let ranked: Vec<_> =
			[0.5_f32, -1.0, 2.0, -3.0].iter().enumerate().map(|(i, &s)| candidate(&i.to_string(), s)).collect();
		let mut last_len = usize::MAX;

		for threshold in [-5.0_f32, -2.0, 0.0, 1.0, 3.0] {
			let ranked: Vec<_> =
				ranked.iter().map(|c| candidate(&c.doc.item.id, c.final_score)).collect();
			let selected = select(&ranking(threshold), &HashMap::new(), ranked, 10);

			assert!(selected.len() <= last_len);
			last_len = selected.len();
		}
	}

	#[test]
	fn select_truncates_to_requested_count() {
		let ranked = vec![candidate("a", 3.0), candidate("b", 2.0), candidate("c", 1.0)];
		let selected = select(&ranking(-2.0), &HashMap::new(), ranked, 2);

		assert_eq!(selected.len(), 2);
	}

	#[test]
	fn select_remaps_urls_through_redirects() {
		let redirects = HashMap::from([(
			"https://example.com/a".to_string(),
			"https://example.com/a-renamed".to_string(),
		)]);
		let ranked = vec![candidate("a", 1.0), candidate("b", 1.0)];
		let selected = select(&ranking(-2.0), &redirects, ranked, 10);

		assert_eq!(selected[0].url, "https://example.com/a-renamed");
		assert_eq!(selected[1].url, "https://example.com/b");
	}
}
