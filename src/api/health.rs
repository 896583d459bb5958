//! Health check endpoint

use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, router::Params, AppState};

use super::{envelope, ApiEnvelope};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = ApiEnvelope<HealthResponse>)
    )
)]
pub async fn health_check(_state: AppState, _params: Params) -> AppResult<Response> {
    Ok(envelope(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
