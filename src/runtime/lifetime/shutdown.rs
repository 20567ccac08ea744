use tokio::signal;
use tracing::{info, warn};

/// 等待 Ctrl+C（Unix 上也响应 SIGTERM）
pub async fn listen_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                wait_ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = wait_ctrl_c() => {}
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    wait_ctrl_c().await;
}

async fn wait_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, shutting down..."),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}
