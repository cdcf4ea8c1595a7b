use crate::signature::verify_signature;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use leadline_channels::{WebhookPayload, WhatsAppChannel};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared application state.
pub struct AppState {
    pub channel: Arc<WhatsAppChannel>,
    pub verify_token: String,
    pub app_secret: Option<String>,
}

/// Query parameters of Meta's subscription verification request.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the gateway router.
    pub fn build(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/webhook", get(verify_handler).post(receive_handler))
            .with_state(state)
    }
}

async fn health_handler() -> impl IntoResponse {
    serde_json::json!({"status": "ok", "service": "leadline"}).to_string()
}

/// Meta subscription verification (`GET /webhook`).
///
/// Echoes `hub.challenge` when the mode is `subscribe` and the token
/// matches; anything else is forbidden.
async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    let subscribe = params.mode.as_deref() == Some("subscribe");
    let token_ok = params.verify_token.as_deref() == Some(state.verify_token.as_str());

    if subscribe && token_ok {
        info!("Webhook subscription verified");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        warn!("Webhook verification rejected");
        (
            StatusCode::FORBIDDEN,
            serde_json::json!({"error": "verification failed"}).to_string(),
        )
    }
}

/// Signed webhook notifications (`POST /webhook`).
///
/// The signature covers the raw body bytes, so the body is taken as
/// [`Bytes`] and parsed only after verification.
async fn receive_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Some(secret) = &state.app_secret {
        let header_value = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !verify_signature(secret, &body, header_value) {
            warn!("Webhook signature validation failed");
            return (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({"error": "invalid signature"}).to_string(),
            );
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Webhook payload parse failed");
            return (
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "malformed payload"}).to_string(),
            );
        }
    };

    // A verified payload is acknowledged even if forwarding fails;
    // non-2xx would make Meta redeliver it.
    if let Err(e) = state.channel.ingest(payload).await {
        error!(error = %e, "Webhook ingest failed");
    }

    (
        StatusCode::OK,
        serde_json::json!({"status": "accepted"}).to_string(),
    )
}
