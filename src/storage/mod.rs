use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{InsertOutcome, LINK_STATUS_ACTIVE, LinkRecord, StorageConfig};

/// 链接存储抽象
///
/// 三个操作对应一次创建请求里最多的三次数据库往返。
/// 所有查询都是参数化的，实现方不得拼接 SQL。
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// 按 slug 精确查找
    async fn find_by_slug(&self, slug: &str) -> Result<Option<LinkRecord>>;

    /// 按 url 精确查找；存在多条时返回最早插入的一条
    async fn find_by_url(&self, url: &str) -> Result<Option<LinkRecord>>;

    /// 插入新记录，slug 冲突时返回 [`InsertOutcome::SlugTaken`]
    async fn insert(&self, link: &LinkRecord) -> Result<InsertOutcome>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
