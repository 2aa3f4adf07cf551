use lexis_backend::config::Config;
use lexis_backend::db::DatabaseProxy;
use lexis_backend::logging;
use lexis_backend::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level, config.log_dir.as_deref());

    let model = match config.decay_model() {
        Ok(model) => model,
        Err(err) => {
            tracing::error!(error = %err, "invalid retention model settings");
            std::process::exit(1);
        }
    };

    let db = match DatabaseProxy::connect(&config.database_url, config.db_max_connections).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, url = %config.database_url, "database initialization failed");
            std::process::exit(1);
        }
    };

    let app = lexis_backend::create_app(AppState::new(db.clone(), model));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "bind listener failed");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "lexis-backend listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped, closing database pool");
    db.close().await;
    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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
