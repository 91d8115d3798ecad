//! Router assembly and server startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerArgs;

use super::{
    handler::{
        create_record, delete_record, get_record, get_session, health_check, list_records,
        sign_in_anonymous, sign_in_custom_token, watch_collection,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the HTTP / WebSocket router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/auth/anonymous", post(sign_in_anonymous))
        .route("/api/auth/custom-token", post(sign_in_custom_token))
        .route("/api/auth/session", get(get_session))
        .route(
            "/api/artifacts/{app_id}/public/data/{collection}",
            post(create_record).get(list_records),
        )
        .route(
            "/api/artifacts/{app_id}/public/data/{collection}/{record_id}",
            get(get_record).delete(delete_record),
        )
        .route(
            "/ws/artifacts/{app_id}/public/data/{collection}",
            get(watch_collection),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `state` on an already bound listener until the shutdown signal
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Bind according to `args` and run the server
pub async fn run(args: ServerArgs) -> std::io::Result<()> {
    let state = Arc::new(AppState::in_memory(&args.custom_tokens));
    let listener = TcpListener::bind(args.bind_address()).await?;
    tracing::info!(
        "Listening on {} ({} custom token(s) issued)",
        listener.local_addr()?,
        args.custom_tokens.len()
    );
    serve(listener, state).await
}
