use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use crop_advisor::{
    api::{create_router, create_router_with, AppState, RouterOptions},
    config::ModelConfig,
    services::InferenceService,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn router_for(model: &str, encoder: Option<&str>) -> Router {
    let config = ModelConfig {
        path: fixture(model),
        label_encoder_path: encoder.map(fixture),
    };
    let inference = InferenceService::load(&config).expect("fixture model should load");
    create_router(AppState::new(inference))
}

fn router() -> Router {
    router_for("crop_model.json", None)
}

async fn send(router: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn predict(router: Router, payload: Value) -> (StatusCode, Value) {
    send(router, Method::POST, "/predict", Body::from(payload.to_string())).await
}

fn rice_payload() -> Value {
    json!({
        "N": 90, "P": 42, "K": 43,
        "temperature": 20.87, "humidity": 82.0, "ph": 6.5, "rainfall": 202.9
    })
}

#[tokio::test]
async fn root_reports_running() {
    let (status, body) = send(router(), Method::GET, "/", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn health_reports_model_loaded() {
    let (status, body) = send(router(), Method::GET, "/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "model_loaded": true}));
}

#[tokio::test]
async fn predicts_rice_for_wet_sample() {
    let (status, body) = predict(router(), rice_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "recommended_crop": "rice"}));
}

#[tokio::test]
async fn predictions_stay_within_known_labels() {
    let samples = [
        json!({"N": 40, "P": 67, "K": 79, "temperature": 18.5, "humidity": 16.9, "ph": 7.2, "rainfall": 79.0}),
        json!({"N": 78, "P": 48, "K": 22, "temperature": 26.0, "humidity": 62.0, "ph": 6.3, "rainfall": 90.0}),
        rice_payload(),
    ];
    let expected = ["chickpea", "maize", "rice"];
    for (payload, crop) in samples.into_iter().zip(expected) {
        let (status, body) = predict(router(), payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_crop"], crop);
    }
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let (status, body) = predict(router(), json!({"N": 90, "P": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Missing fields: K, temperature, humidity, ph, rainfall"
        })
    );
}

#[tokio::test]
async fn non_numeric_field_is_rejected() {
    let mut payload = rice_payload();
    payload["N"] = json!("abc");
    let (status, body) = predict(router(), payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("'N'"));

    let mut payload = rice_payload();
    payload["ph"] = Value::Null;
    let (status, _) = predict(router(), payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn numeric_strings_are_accepted() {
    let mut payload = rice_payload();
    payload["rainfall"] = json!("202.9");
    let (status, body) = predict(router(), payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommended_crop"], "rice");
}

#[tokio::test]
async fn unparsable_body_is_bad_request() {
    let (status, body) = send(router(), Method::POST, "/predict", Body::from("not-json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Invalid or missing JSON body"})
    );
}

#[tokio::test]
async fn body_is_parsed_without_json_content_type() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(rice_payload().to_string()))
        .unwrap();
    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_finite_feature_is_a_prediction_failure() {
    let mut payload = rice_payload();
    payload["humidity"] = json!("nan");
    let (status, body) = predict(router(), payload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Prediction failed:"));
}

#[tokio::test]
async fn encoded_model_is_decoded() {
    let router = router_for("crop_model_encoded.json", Some("label_encoder.json"));
    let (status, body) = predict(router, rice_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommended_crop"], "rice");
}

#[tokio::test]
async fn encoded_model_without_decoder_returns_raw_index() {
    let router = router_for("crop_model_encoded.json", Some("no_such_encoder.json"));
    let (status, body) = predict(router, rice_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommended_crop"], "2");
}

#[tokio::test]
async fn repeated_concurrent_predictions_agree() {
    let router = router();
    let mut handles = Vec::new();
    for _ in 0..16 {
        let router = router.clone();
        handles.push(tokio::spawn(async move { predict(router, rice_payload()).await }));
    }
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_crop"], "rice");
    }
}

#[tokio::test]
async fn cors_preflight_is_answered_when_enabled() {
    let config = ModelConfig {
        path: fixture("crop_model.json"),
        label_encoder_path: None,
    };
    let state = AppState::new(InferenceService::load(&config).unwrap());
    let router = create_router_with(
        state,
        RouterOptions {
            cors: true,
            trace: false,
        },
    );
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
