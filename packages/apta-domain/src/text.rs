use std::collections::HashSet;

/// Lowercase whitespace tokenization. Retrieval scoring and the boost
/// arithmetic both key off this exact rule, so it stays deliberately plain.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace().map(|token| token.to_lowercase()).collect()
}

pub fn token_set(text: &str) -> HashSet<String> {
	tokenize(text).into_iter().collect()
}

/// Fraction of `query_tokens` that appear in `text_tokens`. Zero when the
/// query side is empty.
pub fn overlap_ratio(query_tokens: &HashSet<String>, text_tokens: &HashSet<String>) -> f32 {
	if query_tokens.is_empty() {
		return 0.0;
	}

	let matched = query_tokens.intersection(text_tokens).count();

	matched as f32 / query_tokens.len() as f32
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tokenize_lowercases_and_splits() {
		assert_eq!(tokenize("Entry  Level Python"), vec!["entry", "level", "python"]);
		assert!(tokenize("   ").is_empty());
	}

	#[test]
	fn overlap_ratio_counts_distinct_tokens() {
		let query = token_set("entry level python developer");
		let doc = token_set("python python developer assessment");

		assert_eq!(overlap_ratio(&query, &doc), 0.5);
	}

	#[test]
	fn overlap_ratio_empty_query_is_zero() {
		let query = HashSet::new();
		let doc = token_set("anything");

		assert_eq!(overlap_ratio(&query, &doc), 0.0);
	}
}
