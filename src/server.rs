//! HTTP + WebSocket surface: session REST endpoints and the per-room
//! control channel.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, SessionError};
use crate::knowledge::KnowledgeBase;
use crate::session::{SessionRecord, SessionRegistry, SessionService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SessionService>,
    pub registry: Arc<SessionRegistry>,
    pub knowledge: Arc<dyn KnowledgeBase>,
}

/// Build the Axum router with session REST and control-channel routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/voice-session/start", post(start_session))
        .route("/api/voice-session/{session_id}/end", post(end_session))
        .route("/api/voice-session/{session_id}", get(get_session))
        .route("/api/voice-session/{session_id}/speech", post(post_speech))
        .route("/api/knowledge/query", post(query_knowledge))
        .route("/ws/{room_name}", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "voice-onboard"
    }))
}

// ── Session REST ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct StartRequest {
    #[serde(default = "default_user_id")]
    user_id: String,
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

async fn start_session(
    State(state): State<AppState>,
    body: Option<Json<StartRequest>>,
) -> impl IntoResponse {
    let Json(request) = body.unwrap_or_default();

    match state.service.start(&request.user_id).await {
        Ok(started) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "session_id": started.session_id,
                "token": started.token,
                "livekit_url": started.livekit_url,
                "room_name": started.room_name,
            })),
        ),
        Err(e) => {
            warn!(error = %e, "Failed to start session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": format!("Failed to start session: {e}"),
                })),
            )
        }
    }
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.service.end(session_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": format!("Session {session_id} ended successfully"),
            })),
        ),
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Failed to end session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": format!("Failed to end session: {e}"),
                })),
            )
        }
    }
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.service.get(session_id).await {
        Some(view) => (StatusCode::OK, Json(serde_json::json!(view))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("Session {session_id} not found")})),
        ),
    }
}

#[derive(Deserialize)]
struct SpeechRequest {
    text: String,
}

/// Hook for the speech-to-text pipeline: deliver a finished user
/// utterance to the session's engine.
async fn post_speech(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SpeechRequest>,
) -> impl IntoResponse {
    match state.service.speech(session_id, &body.text).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"success": true}))),
        Err(Error::Session(SessionError::NotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("Session {session_id} not found")})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"success": false, "error": e.to_string()})),
        ),
    }
}

// ── Knowledge base ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct KnowledgeRequest {
    question: String,
}

async fn query_knowledge(
    State(state): State<AppState>,
    Json(body): Json<KnowledgeRequest>,
) -> impl IntoResponse {
    let answer = state.knowledge.query(&body.question).await;
    Json(serde_json::json!({"answer": answer}))
}

// ── Control channel WebSocket ───────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room_name): Path<String>,
) -> Response {
    match state.registry.find_by_room(&room_name).await {
        Some(record) => {
            info!(room = %room_name, "Control channel client connecting");
            ws.on_upgrade(move |socket| handle_socket(socket, record))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("No session for room {room_name}")})),
        )
            .into_response(),
    }
}

async fn handle_socket(mut socket: WebSocket, record: SessionRecord) {
    let room = record.room_name.clone();

    // Subscribe before the agent joins so the welcome is not missed.
    let mut rx = record.channel.subscribe();
    record.engine.lock().await.on_join(record.channel.clone());

    loop {
        tokio::select! {
            // Forward engine events to this client.
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if socket.send(Message::Text(json.into())).await.is_err() {
                                debug!(room = %room, "Client disconnected during send");
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(room = %room, missed = n, "Control channel client lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!(room = %room, "Control channel closed");
                        break;
                    }
                }
            }

            // Dispatch client frames to the engine.
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        record.engine.lock().await.handle_inbound(&text);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(room = %room, "Control channel client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(room = %room, error = %e, "Control channel error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!(room = %room, "Control channel connection closed");
}
