//! Student server: loads config from env, opens the store, applies migrations,
//! serves the API and closes the store after a graceful shutdown.
//!
//! Run from repo root: `cargo run -p student-server`
//! Without a database: `STORE_BACKEND=memory cargo run -p student-server`

use std::sync::Arc;

use student_service::{
    app, apply_migrations, config, connect_pool, ensure_database_exists, telemetry, AppState,
    Config, MemoryStudentStore, PgStudentStore, StoreBackend, StudentStore,
};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = config::load_dotenv();
    telemetry::init_tracing("student_service=info,student_server=info,tower_http=info");
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let store: Arc<dyn StudentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            if config.database.create_database {
                ensure_database_exists(&config.database.connect_options()?).await?;
            }
            let pool = connect_pool(&config.database).await?;
            let applied = apply_migrations(&pool).await?;
            tracing::info!(count = applied.len(), "migrations checked");
            Arc::new(PgStudentStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data will not survive a restart");
            Arc::new(MemoryStudentStore::new())
        }
    };

    let router = app(AppState::new(store.clone()), &config.http);

    let listener = TcpListener::bind(config.http.bind_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        prefix = %config.http.api_prefix,
        backend = store.backend_tag(),
        "listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
