use sea_orm_migration::prelude::*;

/// Longest `user_id` / `platform` accepted; fits a UUID and any provider name.
const KEY_COLUMN_LENGTH: u32 = 64;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // MySQL compares strings case-insensitively by default; keys must not.
        let key_collation = match manager.get_database_backend() {
            sea_orm::DatabaseBackend::MySql => Some("CHARACTER SET utf8mb4 COLLATE utf8mb4_bin"),
            _ => None,
        };
        let mut user_id = ColumnDef::new(Credential::UserId);
        user_id.string_len(KEY_COLUMN_LENGTH).not_null();
        let mut platform = ColumnDef::new(Credential::Platform);
        platform.string_len(KEY_COLUMN_LENGTH).not_null();
        if let Some(collation) = key_collation {
            user_id.extra(collation);
            platform.extra(collation);
        }

        // credentials 表
        manager
            .create_table(
                Table::create()
                    .table(Credential::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credential::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(user_id)
                    .col(platform)
                    .col(
                        ColumnDef::new(Credential::SecretCiphertext)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One live token per (user_id, platform); upserts conflict on this index.
        manager
            .create_index(
                Index::create()
                    .name("idx_credentials_user_platform")
                    .table(Credential::Table)
                    .col(Credential::UserId)
                    .col(Credential::Platform)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Credential::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Credential {
    #[sea_orm(iden = "credentials")]
    Table,
    Id,
    UserId,
    Platform,
    SecretCiphertext,
}
