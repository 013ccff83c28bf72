use crate::app::context::AppContext;
use crate::core::{ForecastResult, HistoricalRecord};
use crate::utils::error::Result;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/*path", get(static_asset))
        .route("/api/history", get(history))
        .route("/api/next", get(next_launch))
        .route("/health", get(health))
        .with_state(ctx)
}

/// Serves until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, ctx: Arc<AppContext>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn history(State(ctx): State<Arc<AppContext>>) -> Json<Vec<HistoricalRecord>> {
    Json(ctx.history.clone())
}

async fn next_launch(State(ctx): State<Arc<AppContext>>) -> Json<ForecastResult> {
    Json(ctx.forecaster.forecast(ctx.classifier.as_ref()).await)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "nominal" }))
}

async fn index(State(ctx): State<Arc<AppContext>>) -> Response {
    send_file(&ctx, "index.html").await
}

async fn static_asset(State(ctx): State<Arc<AppContext>>, Path(path): Path<String>) -> Response {
    send_file(&ctx, &path).await
}

async fn send_file(ctx: &AppContext, relative: &str) -> Response {
    let Some(path) = ctx.frontend_path(relative) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(relative))], bytes).into_response(),
        Err(e) => {
            tracing::debug!("Front-end file {} not served: {}", path.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn content_type(path: &str) -> &'static str {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
