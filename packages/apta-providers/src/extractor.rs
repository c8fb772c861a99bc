use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Chat-completions oracle used for constraint extraction and query
/// expansion. The model is asked for strict JSON; a non-JSON reply is
/// retried a bounded number of times before giving up.
pub async fn extract(cfg: &apta_config::LlmProviderConfig, messages: &[Value]) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	for _ in 0..3 {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"messages": messages,
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		if let Ok(parsed) = parse_extractor_json(json) {
			return Ok(parsed);
		}
	}

	Err(eyre::eyre!("Extractor response is not valid JSON."))
}

fn parse_extractor_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		// Some models wrap the JSON in prose; keep only the outermost object.
		let start = content.find('{');
		let end = content.rfind('}');
		let raw = match (start, end) {
			(Some(start), Some(end)) if start < end => &content[start..=end],
			_ => content,
		};
		let parsed: Value = serde_json::from_str(raw)
			.map_err(|_| eyre::eyre!("Extractor content is not valid JSON."))?;

		return Ok(parsed);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(eyre::eyre!("Extractor response is missing JSON content."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"queries\": []}" } }
			]
		});
		let parsed = parse_extractor_json(json).expect("parse failed");
		assert!(parsed.get("queries").is_some());
	}

	#[test]
	fn strips_prose_around_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "Here you go:\n{\"max_duration_minutes\": 60}\nDone." } }
			]
		});
		let parsed = parse_extractor_json(json).expect("parse failed");
		assert_eq!(parsed.get("max_duration_minutes").and_then(Value::as_u64), Some(60));
	}

	#[test]
	fn rejects_non_json_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "no structured data here" } }
			]
		});
		assert!(parse_extractor_json(json).is_err());
	}
}
