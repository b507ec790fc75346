//! Auth redirect listener.
//!
//! Answers `GET` on any path with 200 and refuses every other method with 403.

use crate::error::BotError;
use axum::Router;
use axum::http::{Method, StatusCode, Uri};
use classmate_core::Result;

/// Router of the redirect listener.
pub fn router() -> Router {
    Router::new().fallback(handle)
}

async fn handle(method: Method, uri: Uri) -> StatusCode {
    if method != Method::GET {
        tracing::debug!(%method, %uri, "Refusing non-GET redirect request");
        return StatusCode::FORBIDDEN;
    }
    tracing::debug!(%uri, "Redirect request");
    StatusCode::OK
}

/// Serves the redirect listener on `addr` until the process exits.
///
/// # Errors
///
/// Returns an error if `addr` cannot be bound or the listener fails.
pub async fn serve(addr: &str) -> Result<(), BotError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BotError::Redirect {
            addr: addr.to_string(),
            details: e.to_string(),
        })?;

    tracing::info!(addr, "Redirect listener started");

    axum::serve(listener, router())
        .await
        .map_err(|e| BotError::Redirect {
            addr: addr.to_string(),
            details: e.to_string(),
        })?;
    Ok(())
}
