use std::collections::HashSet;

/// Domain terms that justify including a catalog item on a single-token name
/// overlap. Statistical retrievers under-rank short proper-noun names like
/// "Verbal Reasoning" for equally short queries; this list anchors them.
pub const HIGH_VALUE_KEYWORDS: &[&str] = &[
	"verbal",
	"numerical",
	"logical",
	"personality",
	"cognitive",
	"aptitude",
	"java",
	"python",
	"sql",
	"tableau",
	"react",
	"angular",
	"node",
	"marketing",
	"sales",
	"finance",
	"account",
	"manager",
	"english",
	"communication",
];

/// Recall safety net for the candidate pool: decides whether an item's name
/// literally overlaps the query. Matched items are only ever added as
/// candidates, never scored by this pass.
pub fn name_matches(query: &str, name: &str, extra_keywords: &[String]) -> bool {
	let query_lower = query.to_lowercase();
	let name_lower = name.to_lowercase();

	if name_lower.trim().is_empty() {
		return false;
	}

	// Full name as a literal substring of the query.
	if name_lower.len() > 3 && query_lower.contains(&name_lower) {
		return true;
	}

	let query_tokens: HashSet<&str> = query_lower.split_whitespace().collect();
	let name_tokens: HashSet<&str> = name_lower.split_whitespace().collect();

	if name_tokens.is_empty() {
		return false;
	}

	let common: Vec<&str> = query_tokens.intersection(&name_tokens).copied().collect();

	if common.is_empty() {
		return false;
	}
	if common
		.iter()
		.any(|token| HIGH_VALUE_KEYWORDS.contains(token) || extra_keywords.iter().any(|k| k == token))
	{
		return true;
	}

	let overlap = common.len();

	// Short names need a single overlapping token; longer names need half
	// their tokens or two tokens absolute.
	if name_tokens.len() <= 2 {
		overlap >= 1
	} else {
		overlap * 2 >= name_tokens.len() || overlap >= 2
	}
}
