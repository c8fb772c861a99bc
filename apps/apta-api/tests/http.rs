use std::{collections::HashMap, sync::Arc};

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use apta_api::{routes, state::AppState};
use apta_service::{Providers, RecommendService};
use apta_testkit::{StaticCatalog, StaticEmbedding, StaticExtractor, StaticRerank, catalog_doc, test_config};

fn test_state() -> AppState {
	let catalog = StaticCatalog::new(vec![
		catalog_doc("python", "Python Programming", "python programming assessment"),
		catalog_doc("sales", "Sales Screening", "sales aptitude screening"),
	]);
	let providers = Providers::new(
		Arc::new(StaticEmbedding { vector: vec![0.1, 0.2, 0.3] }),
		Arc::new(StaticRerank { scores: HashMap::new() }),
		Arc::new(StaticExtractor { payload: json!({}) }),
	);
	let service = RecommendService::with_store(test_config(), Arc::new(catalog), providers);

	AppState { service: Arc::new(service) }
}

async fn response_json(response: axum::response::Response) -> Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

	serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_catalog_count() {
	let app = routes::router(test_state());

	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = response_json(response).await;

	assert_eq!(body["status"], "ok");
	assert_eq!(body["assessment_count"], 2);
}

#[tokio::test]
async fn health_reports_degraded_without_catalog() {
	let state = AppState { service: Arc::new(RecommendService::degraded(test_config())) };
	let app = routes::router(state);

	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
		.await
		.unwrap();
	let body = response_json(response).await;

	assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn recommend_returns_yes_no_flags() {
	let app = routes::router(test_state());

	let request = Request::builder()
		.method("POST")
		.uri("/recommend")
		.header("content-type", "application/json")
		.body(Body::from(r#"{"query":"python programming","n_results":5}"#))
		.unwrap();
	let response = app.oneshot(request).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = response_json(response).await;
	let assessments = body["recommended_assessments"].as_array().unwrap();

	assert!(!assessments.is_empty());
	assert_eq!(assessments[0]["name"], "Python Programming");
	assert_eq!(assessments[0]["remote_support"], "Yes");
	assert_eq!(assessments[0]["adaptive_support"], "No");
	assert!(assessments[0]["test_type"].is_array());
}

#[tokio::test]
async fn recommend_rejects_blank_query() {
	let app = routes::router(test_state());

	let request = Request::builder()
		.method("POST")
		.uri("/recommend")
		.header("content-type", "application/json")
		.body(Body::from(r#"{"query":"   ","n_results":null}"#))
		.unwrap();
	let response = app.oneshot(request).await.unwrap();

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = response_json(response).await;

	assert_eq!(body["error_code"], "invalid_request");
}
