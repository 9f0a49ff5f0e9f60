mod app;
mod config;
mod routes;
mod state;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::{AppState, AssetDirs};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dirs = AssetDirs::from_env();
    for (label, dir) in [
        ("map resources", &dirs.resources),
        ("cosmetic maps", &dirs.cosmetic),
        ("client dist", &dirs.client_dist),
    ] {
        if dir.is_dir() {
            tracing::info!(dir = %dir.display(), "serving {label}");
        } else {
            tracing::warn!(dir = %dir.display(), "{label} directory is missing; requests will 404");
        }
    }

    let app = app::build_app(AppState::new(dirs));

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("Frontier map server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    tokio::select! {
        () = ctrl_c() => {},
        () = terminate() => {},
    }
    tracing::info!("Shutdown signal received");
}

// A handler that fails to install never fires; the other one still can.
async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
