//! HTTP server lifecycle: bind, spawn the accept loop in a background task,
//! return a handle with a shutdown channel. Tests and embedders use
//! `start_server_on` with port 0 to get an ephemeral-port handle; `main`
//! serves its configured address directly.

use std::net::{IpAddr, SocketAddr};

use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::api::router::{describe_router, AppState};

/// Session metadata for a running describe server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running server instance.
pub struct DescribeServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DescribeServer {
    /// Shut down the server gracefully. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("describe server shutdown signal sent");
        }
    }
}

/// Start the describe server on the given IP with an ephemeral port when
/// `port` is 0. Spawns the accept loop in a background tokio task and
/// returns a handle with session metadata and a shutdown channel.
pub async fn start_server_on(
    state: AppState,
    ip: IpAddr,
    port: u16,
) -> Result<DescribeServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(ip, port)).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "describe server binding");

    let app = describe_router(state);

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("describe server received shutdown signal");
        };

        tracing::info!(%addr, "describe server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("describe server error: {e}");
        }

        tracing::info!("describe server stopped");
    });

    Ok(DescribeServer {
        session,
        shutdown_tx: Some(shutdown_tx),
    })
}
