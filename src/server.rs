//! HTTP surface: the WebSocket endpoint the debate client connects to.

use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::relay;
use crate::transcribe::DiscardSink;

#[derive(Debug, Deserialize)]
struct WsParams {
    /// Sample rate of the client's audio pipeline, negotiated once per
    /// connection.
    #[serde(rename = "sample-rate")]
    sample_rate: u32,
}

pub fn router(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(config)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(config): State<Arc<Config>>,
) -> Response {
    if params.sample_rate == 0 {
        return (StatusCode::BAD_REQUEST, "sample-rate must be positive").into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, params.sample_rate, config))
}

async fn handle_socket(socket: WebSocket, sample_rate: u32, config: Arc<Config>) {
    tracing::info!(sample_rate, "debate session connected");
    match relay::run(socket, sample_rate, &config, Box::new(DiscardSink)).await {
        Ok(()) => tracing::info!("debate session closed"),
        Err(e) => tracing::warn!(error = %e, "debate session ended with error"),
    }
}
