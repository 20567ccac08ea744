//! Server mode
//!
//! Builds the shared state once, then starts one actix worker per core.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::routes;
use crate::config::get_config;
use crate::runtime::lifetime;

/// Run the HTTP server until it stops or a shutdown signal arrives
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let state = lifetime::startup::prepare_app_state(&config)
        .await
        .map_err(|e| {
            error!("Server startup failed: {:#}", e);
            e
        })?;
    let state = web::Data::new(state);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)?
    .run();

    info!("Starting server at http://{}", bind_address);
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown: server stopped");
        }
    }

    Ok(())
}
