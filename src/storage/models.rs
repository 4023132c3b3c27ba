use serde::{Deserialize, Serialize};

/// 新建记录的固定状态（active）
pub const LINK_STATUS_ACTIVE: i32 = 1;

/// 一条短链接记录，对应 `links` 表
///
/// 创建后不可变：本服务没有更新或删除路径。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub slug: String,
    pub ip: Option<String>,
    pub status: i32,
    pub ua: Option<String>,
    pub create_time: String,
}

/// 插入结果
///
/// slug 唯一约束冲突不是错误，由调用方决定重试或回读。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    SlugTaken,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
