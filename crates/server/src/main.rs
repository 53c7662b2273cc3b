use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use server_api::{
    add_stopword,
    analysis::Analyzer,
    current_image, generate, remove_stopword,
    render::{CloudRenderer, GlyphRenderer, MissingFontRenderer},
    ApiContext,
};
use shared::{
    domain::{
        ADD_STOPWORD_ROUTE, GENERATE_ROUTE, HEALTHZ_ROUTE, REMOVE_STOPWORD_ROUTE,
        SAVED_IMAGE_FILENAME, SAVE_IMAGE_ROUTE,
    },
    error::ErrorCode,
    protocol::{GenerateRequest, GenerateResponse, StatusResponse, StopwordRequest},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let renderer = build_renderer(&settings)?;
    let analyzer = tokio::task::spawn_blocking(Analyzer::new)
        .await
        .context("failed to load segmentation dictionary")?;

    let state = AppState {
        api: ApiContext::new(Arc::new(analyzer), renderer),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "word cloud server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_renderer(settings: &Settings) -> anyhow::Result<Arc<dyn CloudRenderer>> {
    let options = settings.render_options()?;
    let Some(font_path) = settings.font_path.as_deref() else {
        warn!("no font configured; generation will fail until WORDCLOUD_FONT_PATH is set");
        return Ok(Arc::new(MissingFontRenderer));
    };

    match GlyphRenderer::from_file(font_path, options) {
        Ok(renderer) => {
            info!(font_path, "loaded word cloud font");
            Ok(Arc::new(renderer))
        }
        Err(error) => {
            error!(font_path, %error, "failed to load font; generation will fail");
            Ok(Arc::new(MissingFontRenderer))
        }
    }
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(HEALTHZ_ROUTE, get(healthz))
        .route(GENERATE_ROUTE, post(http_generate))
        .route(ADD_STOPWORD_ROUTE, post(http_add_stopword))
        .route(REMOVE_STOPWORD_ROUTE, post(http_remove_stopword))
        .route(SAVE_IMAGE_ROUTE, get(http_save_image))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Json<GenerateResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(%rejection, "malformed generate request");
            return Json(GenerateResponse::failed(rejection.body_text()));
        }
    };

    match generate(&state.api, &req.text).await {
        Ok(cloud) => Json(GenerateResponse::ok(cloud.frequencies, cloud.image_data_url)),
        Err(e) => {
            warn!(code = ?e.code, message = %e.message, "generate failed");
            Json(e.into())
        }
    }
}

async fn http_add_stopword(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StopwordRequest>, JsonRejection>,
) -> Json<StatusResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Json(StatusResponse::failed(rejection.body_text())),
    };
    Json(
        add_stopword(&state.api, &req.word)
            .await
            .map_or_else(StatusResponse::from, |()| StatusResponse::ok()),
    )
}

async fn http_remove_stopword(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StopwordRequest>, JsonRejection>,
) -> Json<StatusResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Json(StatusResponse::failed(rejection.body_text())),
    };
    Json(
        remove_stopword(&state.api, &req.word)
            .await
            .map_or_else(StatusResponse::from, |()| StatusResponse::ok()),
    )
}

async fn http_save_image(State(state): State<Arc<AppState>>) -> Response {
    match current_image(&state.api).await {
        Ok(png) => (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{SAVED_IMAGE_FILENAME}\""),
                ),
            ],
            png,
        )
            .into_response(),
        Err(e) if e.code == ErrorCode::NotFound => {
            (StatusCode::BAD_REQUEST, e.message).into_response()
        }
        Err(e) => {
            error!(message = %e.message, "save_image failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.message).into_response()
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
