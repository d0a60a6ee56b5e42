use std::net::SocketAddr;

use {
    axum::{
        Json, Router,
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    secrecy::ExposeSecret,
    serde_json::json,
    tokio::net::TcpListener,
    tower_http::trace::TraceLayer,
    tracing::{debug, error, info, warn},
};

use bridge_line::{SIGNATURE_HEADER, parse_events, verify_signature};

use crate::state::AppState;

/// Build the HTTP router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/webhook/line", post(line_webhook_handler))
        .route("/webhook", post(line_webhook_handler))
        .route("/callback", post(line_webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until the server fails.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "http server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "LINE-Discord Bridge Server",
    }))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = &state.coordinator;
    Json(json!({
        "status": "healthy",
        "correspondent_known": coordinator.correlation().is_set(),
        "transcript_len": coordinator.transcript().len(),
        "advisor": coordinator.has_advisor(),
    }))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn line_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !verify_signature(&body, signature, state.channel_secret.expose_secret()) {
        warn!(
            has_signature = !signature.is_empty(),
            "rejected LINE webhook with invalid signature"
        );
        return error_response(StatusCode::BAD_REQUEST, "Invalid signature");
    }

    let events = match parse_events(&body) {
        Ok(events) => events,
        Err(e) => {
            error!(error = %e, "failed to parse LINE webhook");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        },
    };

    debug!(count = events.len(), "dispatching LINE events");
    if !events.is_empty() {
        // Acknowledge LINE right away; the batch is relayed in order behind it.
        drop(state.coordinator.spawn_relay_batch(events));
    }

    Json(json!({ "status": "ok" })).into_response()
}
