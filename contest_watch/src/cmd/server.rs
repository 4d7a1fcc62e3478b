use crate::modules::handlers::{contests_by_platform, liveness, readiness};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use contest_watch_libs::snapshot::SnapshotStore;
use std::{env, net::SocketAddr, sync::Arc};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let output_dir = env::var("OUTPUT_DIR").unwrap_or_else(|_| {
        tracing::warn!(
            "OUTPUT_DIR environment variable is not set. Snapshots will be read from `output`."
        );
        String::from("output")
    });

    let store = SnapshotStore::new(&output_dir).with_context(|| {
        let message = format!("failed to open snapshot directory {}", output_dir);
        tracing::error!(message);
        message
    })?;

    let app = create_router(store);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to bind server.");

    Ok(())
}

fn create_router(store: SnapshotStore) -> Router {
    Router::new()
        .route("/contests/:platform", routing::get(contests_by_platform))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .layer(Extension(Arc::new(store)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}
