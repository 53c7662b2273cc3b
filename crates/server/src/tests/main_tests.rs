use super::*;
use axum::{body, body::Body, http::Request};
use server_api::render::RenderError;
use shared::domain::WordFrequency;
use tower::ServiceExt;

/// Returns the same bytes for every cloud.
struct StubRenderer;

impl CloudRenderer for StubRenderer {
    fn render(&self, frequencies: &[WordFrequency]) -> Result<Vec<u8>, RenderError> {
        Ok(format!("png:{}", frequencies.len()).into_bytes())
    }
}

fn test_app_with(renderer: Arc<dyn CloudRenderer>, max_body_bytes: usize) -> Router {
    let api = ApiContext::new(Arc::new(Analyzer::new()), renderer);
    build_router(Arc::new(AppState { api }), max_body_bytes)
}

fn test_app() -> Router {
    test_app_with(Arc::new(StubRenderer), 1024 * 1024)
}

fn json_post(route: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(route)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app();
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn generate_returns_frequencies_and_data_url() {
    let app = test_app();
    let response = app
        .oneshot(json_post(
            "/generate",
            serde_json::json!({ "text": "cloud words cloud" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let dto: GenerateResponse = read_json(response).await;
    assert!(dto.success);
    assert_eq!(dto.frequencies[0], WordFrequency::new("cloud", 2));
    assert!(dto.wordcloud_image.starts_with("data:image/png;base64,"));
    assert!(dto.message.is_none());
}

#[tokio::test]
async fn blank_generate_reports_failure_in_body() {
    let app = test_app();
    let response = app
        .oneshot(json_post("/generate", serde_json::json!({ "text": "   " })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let dto: GenerateResponse = read_json(response).await;
    assert!(!dto.success);
    assert_eq!(dto.message.as_deref(), Some("Please enter some text"));
    assert!(dto.frequencies.is_empty());
}

#[tokio::test]
async fn malformed_generate_body_reports_failure() {
    let app = test_app();
    let request = Request::post("/generate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let dto: GenerateResponse = read_json(response).await;
    assert!(!dto.success);
    assert!(dto.message.is_some());
}

#[tokio::test]
async fn missing_font_surfaces_as_generate_failure() {
    let app = test_app_with(Arc::new(MissingFontRenderer), 1024 * 1024);
    let response = app
        .oneshot(json_post("/generate", serde_json::json!({ "text": "cloud words" })))
        .await
        .expect("response");
    let dto: GenerateResponse = read_json(response).await;
    assert!(!dto.success);
    assert_eq!(dto.message.as_deref(), Some("no font is configured for rendering"));
}

#[tokio::test]
async fn stopword_routes_round_trip_through_shared_state() {
    let app = test_app();

    let added: StatusResponse = read_json(
        app.clone()
            .oneshot(json_post("/add_stopword", serde_json::json!({ "word": "cloud" })))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(added, StatusResponse::ok());

    let duplicate: StatusResponse = read_json(
        app.clone()
            .oneshot(json_post("/add_stopword", serde_json::json!({ "word": "cloud" })))
            .await
            .expect("response"),
    )
    .await;
    assert!(!duplicate.success);
    assert_eq!(duplicate.message.as_deref(), Some("Stopword already exists"));

    let generated: GenerateResponse = read_json(
        app.clone()
            .oneshot(json_post(
                "/generate",
                serde_json::json!({ "text": "cloud words cloud" }),
            ))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(generated.frequencies, vec![WordFrequency::new("words", 1)]);

    let removed: StatusResponse = read_json(
        app.clone()
            .oneshot(json_post("/remove_stopword", serde_json::json!({ "word": "cloud" })))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(removed, StatusResponse::ok());

    let missing: StatusResponse = read_json(
        app.oneshot(json_post("/remove_stopword", serde_json::json!({ "word": "cloud" })))
            .await
            .expect("response"),
    )
    .await;
    assert!(!missing.success);
}

#[tokio::test]
async fn save_image_requires_generated_cloud() {
    let app = test_app();
    let request = Request::get("/save_image").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.clone()
        .oneshot(json_post("/generate", serde_json::json!({ "text": "cloud words" })))
        .await
        .expect("generate");

    let request = Request::get("/save_image").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"wordcloud.png\""
    );
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"png:2");
}

#[tokio::test]
async fn generate_accepts_bodies_up_to_configured_limit() {
    let app = test_app_with(Arc::new(StubRenderer), 4 * 1024 * 1024);
    let text = "cloud words ".repeat(250_000);
    let response = app
        .oneshot(json_post("/generate", serde_json::json!({ "text": text })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let dto: GenerateResponse = read_json(response).await;
    assert!(dto.success, "unexpected failure: {:?}", dto.message);
    assert_eq!(dto.frequencies[0], WordFrequency::new("cloud", 250_000));
}

#[tokio::test]
async fn generate_rejects_bodies_over_configured_limit() {
    let app = test_app_with(Arc::new(StubRenderer), 64 * 1024);
    let text = "cloud words ".repeat(10_000);
    let response = app
        .oneshot(json_post("/generate", serde_json::json!({ "text": text })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let dto: GenerateResponse = read_json(response).await;
    assert!(!dto.success);
    assert!(dto.frequencies.is_empty());
}
