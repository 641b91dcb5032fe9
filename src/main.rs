mod config;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use config::{StoreBackend, StudioConfig};
use store::{FileStore, MemoryStore, ProjectStore};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = StudioConfig::from_env();
    let port = config.port;

    let store: Arc<dyn ProjectStore> = match config.store_backend {
        StoreBackend::File => {
            let file_store = FileStore::new(&config.data_dir);
            tracing::info!(dir = %file_store.dir().display(), "file project store");
            Arc::new(file_store)
        }
        StoreBackend::Memory => {
            tracing::warn!("in-memory project store; edits are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let state = state::AppState::new(store, config);

    // Hydrate the default project so the first request doesn't pay for it.
    let default_project = state.config.default_project.clone();
    if let Err(e) = services::project::ensure_loaded(&state, &default_project).await {
        tracing::warn!(error = %e, project = %default_project, "default project not loaded");
    }

    // Spawn background persistence task.
    let persistence = services::persistence::spawn_persistence_task(state.clone());

    let app = routes::app(state.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "mjml studio listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    persistence.abort();
    let written = services::persistence::flush_projects(&state, true).await;
    tracing::info!(written, "final flush complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
