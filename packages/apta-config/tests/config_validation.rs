use toml::Value;

use apta_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn parse_sample(edit: impl FnOnce(&mut toml::Table)) -> Config {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	edit(root);

	let rendered = toml::to_string(&value).expect("Failed to render template config.");

	toml::from_str(&rendered).expect("Failed to parse rendered config.")
}

fn section<'a>(root: &'a mut toml::Table, path: &[&str]) -> &'a mut toml::Table {
	let mut table = root;
	for key in path {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}
	table
}

#[test]
fn sample_config_validates() {
	let cfg = parse_sample(|_| {});

	apta_config::validate(&cfg).expect("Sample config must validate.");
	assert_eq!(cfg.retrieval.retrieval_k, 50);
	assert_eq!(cfg.ranking.score_threshold, -2.0);
}

#[test]
fn defaults_fill_missing_sections() {
	let cfg = parse_sample(|root| {
		root.remove("retrieval");
		root.remove("ranking");
		root.remove("matcher");
	});

	apta_config::validate(&cfg).expect("Defaults must validate.");
	assert_eq!(cfg.retrieval.max_results, 10);
	assert_eq!(cfg.retrieval.max_query_chars, 1_000);
	assert_eq!(cfg.ranking.keyword_boost_weight, 3.0);
	assert_eq!(cfg.ranking.name_boost_weight, 5.0);
	assert_eq!(cfg.ranking.seniority_penalty, 3.0);
	assert!(cfg.matcher.extra_keywords.is_empty());
}

#[test]
fn rejects_dimension_mismatch() {
	let cfg = parse_sample(|root| {
		section(root, &["storage", "qdrant"])
			.insert("vector_dim".to_string(), Value::Integer(1_024));
	});

	let err = apta_config::validate(&cfg).expect_err("Mismatched dimensions must fail.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_zero_retrieval_k() {
	let cfg = parse_sample(|root| {
		section(root, &["retrieval"]).insert("retrieval_k".to_string(), Value::Integer(0));
	});

	assert!(apta_config::validate(&cfg).is_err());
}

#[test]
fn rejects_negative_boost_weight() {
	let cfg = parse_sample(|root| {
		section(root, &["ranking"]).insert("name_boost_weight".to_string(), Value::Float(-1.0));
	});

	assert!(apta_config::validate(&cfg).is_err());
}

#[test]
fn rejects_blank_provider_key() {
	let cfg = parse_sample(|root| {
		section(root, &["providers", "rerank"])
			.insert("api_key".to_string(), Value::String("  ".to_string()));
	});

	assert!(apta_config::validate(&cfg).is_err());
}
