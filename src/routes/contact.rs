use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use chrono::Utc;

use crate::error::AppError;
use crate::models::{HealthReply, SubmitReply};
use crate::state::SharedState;
use crate::submission::{metadata, parser};

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitReply>, AppError> {
    let ip = metadata::client_ip(&headers, Some(addr.ip()), &state.config.trusted_proxies);
    if let Err(retry_after) = state.submission_limiter.check(ip) {
        tracing::warn!("Rate limited submission from {ip}");
        return Err(AppError::RateLimited(format!(
            "Rate limited. Retry after {retry_after}s"
        )));
    }

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let form = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(&headers, body)
            .await
            .map_err(AppError::BadRequest)?
    } else {
        parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?
    };

    let submitted = state.handler.submit(form).await?;

    Ok(Json(SubmitReply::accepted(
        submitted.sheet_row,
        submitted.email_sent,
    )))
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthReply> {
    Json(HealthReply {
        success: true,
        message: format!("{} Contact Form API is running", state.config.site_name),
        timestamp: Utc::now(),
    })
}
