//! Listener lifecycle.

use crate::{AppState, router};
use kitchen_error::{KitchenResult, ServerError, ServerErrorKind};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Bind the configured port and serve until `shutdown` resolves.
#[instrument(skip_all, fields(addr = %state.config().server().socket_addr()))]
pub async fn serve(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> KitchenResult<()> {
    let addr = state.config().server().socket_addr();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })
    })?;
    info!(%addr, "API server listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("API server stopped");
    Ok(())
}

/// Drop idle rate-limit state once per window.
pub fn spawn_rate_limit_sweeper(state: &AppState) -> JoinHandle<()> {
    let limiter = state.limiter().clone();
    let period = Duration::from_secs((*limiter.config().window_secs()).max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.sweep();
        }
    })
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
