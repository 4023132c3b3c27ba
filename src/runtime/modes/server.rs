//! Server mode
//!
//! Binds the HTTP server and serves `/create` until Ctrl+C.

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::AccessLog;
use crate::api::services::create_routes;
use crate::config::get_config;
use crate::runtime::lifetime;

/// 最大 worker 数
const MAX_WORKERS: usize = 32;

/// 请求体上限
const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {:#}", e);
            e
        })?;

    let link_service = startup.link_service.clone();
    let db_for_shutdown = startup.storage.get_db().clone();

    let config = get_config();
    let cpu_count = config.server.cpu_count.clamp(1, MAX_WORKERS);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(AccessLog)
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
            .configure(create_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}
