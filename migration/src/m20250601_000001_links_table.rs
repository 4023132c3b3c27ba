use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

/// MySQL 上 url 索引的前缀长度（utf8mb4 下 768 * 4 = 3072 字节上限）
const MYSQL_URL_INDEX_PREFIX: u32 = 768;

/// 精确匹配的字符串列
///
/// MySQL/MariaDB 默认排序规则不区分大小写，这里改成二进制比较。
fn exact_string(column: Links, len: u32, mysql: bool) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    def.string_len(len).not_null();
    if mysql {
        def.extra("CHARACTER SET utf8mb4 COLLATE utf8mb4_bin");
    }
    def
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mysql = manager.get_database_backend() == DatabaseBackend::MySql;

        // 创建 links 表
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(exact_string(Links::Url, 2048, mysql))
                    .col(exact_string(Links::Slug, 64, mysql))
                    .col(ColumnDef::new(Links::Ip).string().null())
                    .col(
                        ColumnDef::new(Links::Status)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Links::Ua).text().null())
                    .col(ColumnDef::new(Links::CreateTime).string().not_null())
                    .to_owned(),
            )
            .await?;

        // slug 唯一约束，读后写竞争由数据库兜底
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_slug")
                    .table(Links::Table)
                    .col(Links::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // url 去重查询索引
        let mut url_index = Index::create();
        url_index
            .if_not_exists()
            .name("idx_links_url")
            .table(Links::Table);
        if mysql {
            url_index.col((Links::Url, MYSQL_URL_INDEX_PREFIX));
        } else {
            url_index.col(Links::Url);
        }
        manager.create_index(url_index).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_url").table(Links::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_slug").table(Links::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    Table,
    Id,
    Url,
    Slug,
    Ip,
    Status,
    Ua,
    CreateTime,
}
