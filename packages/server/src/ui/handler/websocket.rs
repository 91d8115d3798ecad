//! WebSocket live watch of a collection.
//!
//! The server sends the full collection on connect and again after every
//! change to it. Clients never receive diffs.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    domain::CollectionPath,
    infrastructure::dto::{
        http::RecordDto,
        websocket::{ErrorMessage, MessageType, SnapshotMessage},
    },
    ui::state::{AppState, WatchQuery},
    usecase::ListRecordsUseCase,
};

use super::{ApiError, auth::authenticate};

pub async fn watch_collection(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((app_id, collection)): Path<(String, String)>,
    Query(query): Query<WatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = authenticate(&state, query.token.as_deref()).await?;
    let path = CollectionPath::from_segments(&app_id, &collection)?;

    tracing::info!("User '{}' watching {}", user_id, path);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, path)))
}

/// Serialize the current snapshot, or an error frame when the read fails
async fn snapshot_frame(usecase: &ListRecordsUseCase, path: &CollectionPath) -> String {
    let frame = match usecase.execute(path).await {
        Ok(records) => serde_json::to_string(&SnapshotMessage {
            r#type: MessageType::Snapshot,
            path: path.to_string(),
            records: records.iter().map(RecordDto::from).collect(),
        }),
        Err(e) => {
            tracing::warn!("Failed to read snapshot of {}: {}", path, e);
            serde_json::to_string(&ErrorMessage {
                r#type: MessageType::Error,
                error: e.to_string(),
            })
        }
    };
    frame.unwrap_or_else(|e| format!(r#"{{"type":"error","error":"{e}"}}"#))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, path: CollectionPath) {
    let (mut sender, mut receiver) = socket.split();
    let usecase = ListRecordsUseCase::new(state.documents.clone());

    // Subscribe before the first read so no change slips between them.
    let mut changes = usecase.changes();

    let initial = snapshot_frame(&usecase, &path).await;
    if sender.send(Message::Text(initial.into())).await.is_err() {
        tracing::debug!("Watcher of {} left before the first snapshot", path);
        return;
    }

    loop {
        tokio::select! {
            change = changes.recv() => {
                match change {
                    Ok(changed) if changed != path => continue,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Watcher of {} lagged by {} notifications", path, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
                let frame = snapshot_frame(&usecase, &path).await;
                if sender.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error on watch of {}: {}", path, e);
                        break;
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!("Watcher of {} disconnected", path);
}
