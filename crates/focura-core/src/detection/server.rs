//! Mock detection HTTP API.
//!
//! - `POST /api/posture` → `{posture, confidence, timestamp}`
//! - `POST /api/phone-detection` → `{phoneDetected, confidence, timestamp}`
//!
//! Both take a multipart form with an `image` field. A form without one is
//! a 400; a body that cannot be read as a form is a 500.

use std::future::Future;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::DetectionProvider;
use crate::error::Result;

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

type Provider = Arc<dyn DetectionProvider>;

pub fn router(provider: Provider) -> Router {
    Router::new()
        .route("/api/posture", post(detect_posture))
        .route("/api/phone-detection", post(detect_phone))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(provider)
}

/// Bind a listener for [`serve`].
///
/// # Errors
/// Returns [`crate::CoreError::Io`] if the address is invalid or taken.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    Ok(TcpListener::bind(addr).await?)
}

/// Serve the API on `listener` until `shutdown` resolves.
///
/// # Errors
/// Returns [`crate::CoreError::Io`] if the server fails while accepting
/// connections.
pub async fn serve(
    listener: TcpListener,
    provider: Provider,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "detection API listening");
    }
    axum::serve(listener, router(provider))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

enum ImageError {
    Missing,
    Unreadable(String),
}

async fn read_image(multipart: Result<Multipart, MultipartRejection>) -> Result<Vec<u8>, ImageError> {
    let mut multipart = multipart.map_err(|e| ImageError::Unreadable(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImageError::Unreadable(e.body_text()))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ImageError::Unreadable(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ImageError::Missing)
}

fn failure(kind: &str, err: ImageError) -> Response {
    match err {
        ImageError::Missing => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No image provided" })),
        )
            .into_response(),
        ImageError::Unreadable(reason) => {
            error!(kind, %reason, "error processing detection request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to process {kind} detection") })),
            )
                .into_response()
        }
    }
}

async fn detect_posture(
    State(provider): State<Provider>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match read_image(multipart).await {
        Ok(image) => Json(provider.posture(&image)).into_response(),
        Err(e) => failure("posture", e),
    }
}

async fn detect_phone(
    State(provider): State<Provider>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match read_image(multipart).await {
        Ok(image) => Json(provider.phone(&image)).into_response(),
        Err(e) => failure("phone", e),
    }
}
