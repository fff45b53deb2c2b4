use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// Users: one row per Telegram user, keyed by the platform-issued id.
#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    FreeSpins,
    LastFreeDate,
    CreatedAt,
}

/// Spins: append-only audit log. Prize name/sticker are denormalized
/// snapshots taken at spin time so later catalog edits never alter history.
#[derive(DeriveIden)]
enum Spins {
    Table,
    Id,
    UserId,
    PrizeName,
    PrizeSticker,
    CreatedAt,
}

/// Config: key/value store owned by the catalog-editing bot flow.
/// This service only reads it.
#[derive(DeriveIden)]
enum ConfigEntries {
    Table,
    Key,
    Value,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::FreeSpins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::LastFreeDate).date().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Spins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Spins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Spins::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Spins::PrizeName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Spins::PrizeSticker)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Spins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_spins_user")
                    .table(Spins::Table)
                    .col(Spins::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConfigEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConfigEntries::Key)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConfigEntries::Value)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed a playable default catalog: 4 equal-weight gifts, 3 free
        // spins per day, no required channel. Operators overwrite these
        // through the bot admin flow.
        let conn = manager.get_connection();
        let insert_sql = r#"
INSERT INTO config_entries ("key", "value")
VALUES
 ('daily_free_spins', '3'),
 ('required_channel', ''),
 ('gift_count', '4'),
 ('gift1_name', 'Gift 1'), ('gift1_weight', '1'), ('gift1_sticker', ''),
 ('gift2_name', 'Gift 2'), ('gift2_weight', '1'), ('gift2_sticker', ''),
 ('gift3_name', 'Gift 3'), ('gift3_weight', '1'), ('gift3_sticker', ''),
 ('gift4_name', 'Gift 4'), ('gift4_weight', '1'), ('gift4_sticker', '')
ON CONFLICT ("key") DO NOTHING;
"#;
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            insert_sql.to_string(),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Spins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ConfigEntries::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
