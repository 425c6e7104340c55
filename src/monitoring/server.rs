//! Command server: axum HTTP endpoint for on-demand queries plus health.
//!
//! `POST /command` with `{"content": "!vasco"}` answers with the current
//! digest when the content matches the configured token, `204` otherwise.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::engine::NotificationDecision;
use crate::scheduler::Notifier;

/// Shared state accessible by all route handlers.
#[derive(Clone)]
pub struct ServerState {
    notifier: Arc<Notifier>,
}

impl ServerState {
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self { notifier }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommandReply {
    pub decision: NotificationDecision,
    pub reply: String,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/command", post(command_handler))
        .with_state(state)
}

/// Serve on an already bound listener until the server errors out.
pub async fn serve(listener: TcpListener, state: ServerState) {
    if let Err(e) = axum::serve(listener, router(state)).await {
        warn!(error = %e, "Command server error");
    }
}

/// Spawn the command server. Returns a handle that can be aborted.
pub fn spawn_command_server(state: ServerState, bind: &str, port: u16) -> JoinHandle<()> {
    let addr = format!("{bind}:{port}");

    tokio::spawn(async move {
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => {
                info!(addr = %addr, "Command server listening");
                l
            }
            Err(e) => {
                warn!(error = %e, addr = %addr, "Failed to bind command server — continuing without it");
                return;
            }
        };

        serve(listener, state).await;
    })
}

// -- Route Handlers --

async fn health_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.notifier.health().snapshot().await)
}

async fn command_handler(
    State(state): State<ServerState>,
    Json(request): Json<CommandRequest>,
) -> Response {
    if !state.notifier.matches_command(&request.content) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let reply = state.notifier.on_demand(Utc::now()).await;
    Json(CommandReply {
        decision: reply.decision,
        reply: reply.text,
    })
    .into_response()
}
