//! Integration tests for the reco-service HTTP endpoints

use actix_web::{test, web, App};
use article_reco_engine::server::{configure_routes, AppState};
use article_reco_engine::{EngineConfig, RecommendationEngine, SvdConfig, TableSource};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

fn json_file(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

/// 10 articles, 5 users reading two consecutive articles each
fn fixture_files() -> (NamedTempFile, NamedTempFile) {
    let embeddings: Vec<_> = (0..10)
        .map(|i| {
            let embedding: Vec<f32> = (0..5).map(|d| ((i * 7 + d * 3) % 11) as f32 / 10.0).collect();
            json!({"article_id": i, "embedding": embedding})
        })
        .collect();
    let clicks: Vec<_> = (0..10)
        .map(|i| json!({"user_id": i / 2 + 1, "click_article_id": i}))
        .collect();

    (
        json_file(&serde_json::Value::Array(embeddings)),
        json_file(&serde_json::Value::Array(clicks)),
    )
}

fn state(source: TableSource) -> web::Data<AppState> {
    let config = EngineConfig {
        svd: SvdConfig {
            seed: Some(17),
            ..SvdConfig::default()
        },
        ..EngineConfig::default()
    };
    web::Data::new(AppState {
        engine: Arc::new(RecommendationEngine::new(config)),
        source,
        request_timeout: Duration::from_secs(30),
    })
}

fn parse_list(body: &str) -> Vec<i64> {
    body.trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().unwrap())
        .collect()
}

#[actix_web::test]
async fn test_health_reports_service() {
    let (embeddings, clicks) = fixture_files();
    let app = test::init_service(
        App::new()
            .app_data(state(TableSource::new(embeddings.path(), clicks.path())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "reco-service");
}

#[actix_web::test]
async fn test_every_strategy_returns_a_list() {
    let (embeddings, clicks) = fixture_files();
    let app = test::init_service(
        App::new()
            .app_data(state(TableSource::new(embeddings.path(), clicks.path())))
            .configure(configure_routes),
    )
    .await;

    for tag in ["ra", "cb", "cf", "hy", "cv"] {
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(json!({"id": 1, "type": tag}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200, "strategy {}", tag);

        let body = test::read_body(resp).await;
        let items = parse_list(std::str::from_utf8(&body).unwrap());
        assert_eq!(items.len(), 5, "strategy {}", tag);
    }
}

#[actix_web::test]
async fn test_explicit_n() {
    let (embeddings, clicks) = fixture_files();
    let app = test::init_service(
        App::new()
            .app_data(state(TableSource::new(embeddings.path(), clicks.path())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({"id": 2, "type": "cv", "n": 3}))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(parse_list(std::str::from_utf8(&body).unwrap()).len(), 3);
}

#[actix_web::test]
async fn test_collaborative_unknown_user_message() {
    let (embeddings, clicks) = fixture_files();
    let app = test::init_service(
        App::new()
            .app_data(state(TableSource::new(embeddings.path(), clicks.path())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({"id": 99, "type": "cf"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Error: User ID 99 not found in clicks data.");
}

#[actix_web::test]
async fn test_invalid_requests_are_rejected() {
    let (embeddings, clicks) = fixture_files();
    let app = test::init_service(
        App::new()
            .app_data(state(TableSource::new(embeddings.path(), clicks.path())))
            .configure(configure_routes),
    )
    .await;

    for payload in [
        json!({"id": "1", "type": "ra"}),
        json!({"id": 1}),
        json!({"id": 1, "type": "xx"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "payload {}", payload);
    }
}

#[actix_web::test]
async fn test_missing_tables_return_500() {
    let app = test::init_service(
        App::new()
            .app_data(state(TableSource::new(
                "/nonexistent/embeddings.json",
                "/nonexistent/clicks.json",
            )))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({"id": 1, "type": "ra"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Error loading recommendation data");
}
