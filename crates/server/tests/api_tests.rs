//! Integration tests for the server API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tco_lib::{
    health::{components, HealthRegistry},
    TelcoTcoPlugin,
};
use tco_server::api::{create_router, AppState};
use tower::ServiceExt;

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::PRICING_CATALOG).await;
    health_registry.register(components::CALCULATOR).await;

    let state = Arc::new(AppState::new(TelcoTcoPlugin::default(), health_registry));
    let router = create_router(state.clone());

    (router, state)
}

fn deployment() -> Value {
    json!({
        "user_plane": "region",
        "compute": {"vcpu": 48, "memory": 192},
        "storage": {"ebs_storage": 2000, "efs_storage": 100, "s3_storage": 500},
        "network": {
            "peak_bandwidth": 20.0,
            "monthly_tonnage": 150.0,
            "traffic_split": {"direct_connect_percent": 80.0, "internet_gateway_percent": 20.0}
        },
        "eks_clusters": 2,
        "sites": 2,
        "region": "us-east-1"
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_analyze_returns_cost_analysis() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(app, "/api/v1/analyze", deployment().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let monthly = body["monthly_costs"]["total_monthly_cost"].as_f64().unwrap();
    let annual = body["annual_costs"]["total_monthly_cost"].as_f64().unwrap();
    let three_year = body["three_year_tco"].as_f64().unwrap();
    let per_site = body["cost_per_site"].as_f64().unwrap();

    assert!(monthly > 0.0);
    assert!((annual - monthly * 12.0).abs() < 1e-6);
    assert!((three_year - monthly * 36.0).abs() < 1e-6);
    assert!((per_site * 2.0 - monthly).abs() < 1e-6);
    assert!(!body["exclusions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_invalid_split_is_unprocessable() {
    let (app, _state) = setup_test_app().await;

    let mut request = deployment();
    request["network"]["traffic_split"] =
        json!({"direct_connect_percent": 60.0, "internet_gateway_percent": 30.0});

    let (status, body) = post(app, "/api/v1/analyze", request.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation");
    assert!(body["error"].as_str().unwrap().contains("sum to 100%"));
}

#[tokio::test]
async fn test_analyze_zero_vcpu_is_unprocessable() {
    let (app, _state) = setup_test_app().await;

    let mut request = deployment();
    request["compute"]["vcpu"] = json!(0);

    let (status, body) = post(app, "/api/v1/analyze", request.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("vcpu must be >= 1"));
}

#[tokio::test]
async fn test_analyze_malformed_json_is_bad_request() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(app, "/api/v1/analyze", "{\"user_plane\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn test_decode_failures_report_location() {
    let (app, _state) = setup_test_app().await;

    let mut request = deployment();
    request["compute"]["vcpu"] = json!(0);
    let pretty = serde_json::to_string_pretty(&request).unwrap();

    let (status, body) = post(app.clone(), "/api/v1/analyze", pretty).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["details"].as_str().unwrap();
    assert!(details.starts_with("line "), "details: {}", details);
    assert!(!details.starts_with("line 1,"), "details: {}", details);

    let (status, body) = post(app, "/api/v1/analyze", "{\"user_plane\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().starts_with("line 1, column "));
}

#[tokio::test]
async fn test_optimize_returns_sorted_recommendations() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(app, "/api/v1/optimize", deployment().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let recommendations = body.as_array().unwrap();
    assert!(!recommendations.is_empty());

    let rank = |p: &str| match p {
        "High" => 0,
        "Medium" => 1,
        _ => 2,
    };
    let ranks: Vec<i32> = recommendations
        .iter()
        .map(|r| rank(r["priority"].as_str().unwrap()))
        .collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert!(recommendations
        .iter()
        .all(|r| r["potential_savings"].as_f64().unwrap() > 0.0));
}

#[tokio::test]
async fn test_compare_prices_both_locations() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(app, "/api/v1/compare", deployment().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["region"]["deployment"]["user_plane"], "region");
    assert_eq!(body["outposts"]["deployment"]["user_plane"], "outposts");

    let region = body["region"]["monthly_costs"]["total_monthly_cost"]
        .as_f64()
        .unwrap();
    let outposts = body["outposts"]["monthly_costs"]["total_monthly_cost"]
        .as_f64()
        .unwrap();
    let difference = body["monthly_difference"].as_f64().unwrap();
    assert!((difference - (region - outposts).abs()).abs() < 1e-6);

    let expected = if outposts < region { "outposts" } else { "region" };
    assert_eq!(body["cheaper"], expected);
}

#[tokio::test]
async fn test_plugin_endpoint_wraps_envelope() {
    let (app, _state) = setup_test_app().await;

    let request = json!({"command": "analyze", "deployment": deployment()});
    let (status, body) = post(app, "/api/v1/plugin", request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["type"], "analysis");
}

#[tokio::test]
async fn test_plugin_endpoint_reports_errors_in_envelope() {
    let (app, _state) = setup_test_app().await;

    let mut deployment = deployment();
    deployment["compute"]["vcpu"] = json!(0);
    let request = json!({"command": "analyze", "deployment": deployment});
    let (status, body) = post(app, "/api/v1/plugin", request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["components"][components::PRICING_CATALOG].is_object());
}

#[tokio::test]
async fn test_healthz_returns_ok_when_degraded() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_degraded(components::PRICING_CATALOG, "Using built-in rates")
        .await;

    let (status, body) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_unhealthy(components::CALCULATOR, "Default instance not priced")
        .await;

    let (status, _body) = get(app, "/healthz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_readyz_follows_ready_flag() {
    let (app, state) = setup_test_app().await;

    let (status, body) = get(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let readiness: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(readiness["ready"], false);

    state.health_registry.set_ready(true).await;

    let (status, _body) = get(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_exposes_tco_series() {
    let (app, _state) = setup_test_app().await;

    let (status, _body) = post(app.clone(), "/api/v1/analyze", deployment().to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("telco_tco_analyses_total"));
    assert!(text.contains("telco_tco_calculation_latency_seconds"));
}
