use crate::storage::LinkRecord;
use migration::entities::link;

/// 将 Sea-ORM Model 转换为 LinkRecord
pub fn model_to_record(model: link::Model) -> LinkRecord {
    LinkRecord {
        url: model.url,
        slug: model.slug,
        ip: model.ip,
        status: model.status,
        ua: model.ua,
        create_time: model.create_time,
    }
}

/// 将 LinkRecord 转换为 ActiveModel（id 交给数据库自增）
pub fn record_to_active_model(record: &LinkRecord) -> link::ActiveModel {
    use sea_orm::ActiveValue::*;

    link::ActiveModel {
        id: NotSet,
        url: Set(record.url.clone()),
        slug: Set(record.slug.clone()),
        ip: Set(record.ip.clone()),
        status: Set(record.status),
        ua: Set(record.ua.clone()),
        create_time: Set(record.create_time.clone()),
    }
}
