use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::get_config;
use crate::services::{LinkPolicy, LinkService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub link_service: Arc<LinkService>,
}

/// 准备服务器启动的上下文
///
/// 连接存储并运行迁移，然后按配置构建 [`LinkService`]。
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.format_simple()))
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let policy = LinkPolicy::from_config(&get_config().links);
    debug!(
        "Link policy: slug length {}, {} insert attempts, conflict status {}",
        policy.random_slug_length,
        policy.max_insert_attempts,
        policy.slug_conflict_status.as_u16()
    );
    let link_service = Arc::new(LinkService::new(storage.clone(), policy));

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        link_service,
    })
}
