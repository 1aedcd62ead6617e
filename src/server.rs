//! HTTP front end for the pipeline.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use eyre::Result;
use log::{error, info};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::pipeline::{Pipeline, PipelineError, PipelineResult};
use crate::summarize::SummaryType;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Only string values pick a mode; anything else falls back to detailed
    #[serde(default)]
    pub summary_type: Option<serde_json::Value>,
}

impl ProcessRequest {
    /// Decode a `/process` body. No body, or a body that is not JSON, reads as `{}`.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self, PipelineError> {
        if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        Json::<Self>::from_bytes(body)
            .map(|Json(req)| req)
            .map_err(|rejection| PipelineError::Unexpected(rejection.body_text()))
    }

    pub fn summary_type(&self) -> SummaryType {
        SummaryType::from_request(self.summary_type.as_ref().and_then(|v| v.as_str()))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(essence) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
    else {
        return false;
    };

    let essence = essence.trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.user_message(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

fn routes() -> Router<Arc<Pipeline>> {
    Router::new()
        .route("/health", get(health))
        .route("/process", post(process))
}

/// Build the application router; routes are served at the root and under `/api`
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .layer(cors)
        .with_state(pipeline)
}

/// Serve until Ctrl-C
pub async fn serve(addr: SocketAddr, pipeline: Arc<Pipeline>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "Server is running" }))
}

pub async fn process(
    State(pipeline): State<Arc<Pipeline>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PipelineResult>, PipelineError> {
    let req = ProcessRequest::from_body(&headers, &body).inspect_err(|e| error!("Unreadable request body: {e}"))?;
    let summary_type = req.summary_type();

    // A panicking stage fails this request only
    let task = tokio::spawn(async move { pipeline.process(req.url.as_deref(), summary_type).await });

    match task.await {
        Ok(Ok(result)) => Ok(Json(result)),
        Ok(Err(e)) => {
            error!("Request failed ({}): {e}", e.status());
            Err(e)
        }
        Err(join_err) => {
            error!("Pipeline task aborted: {join_err}");
            Err(PipelineError::Unexpected(join_err.to_string()))
        }
    }
}
