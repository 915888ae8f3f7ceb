//! HTTP surface: the notes JSON API served with axum.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::storage::NoteStore;
use routes::AppState;

/// Build the API router over `store`.
pub fn router(store: NoteStore) -> Router {
    let state = Arc::new(AppState::new(store));

    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/notes",
            get(routes::list_notes).post(routes::create_note),
        )
        .route("/api/categories", get(routes::categories))
        .route(
            "/api/notes/{id}",
            get(routes::get_note)
                .patch(routes::patch_note)
                .delete(routes::delete_note),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        notes = %config.notes_path.display(),
        "jotter listening"
    );

    let app = router(NoteStore::open(config.notes_path.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
