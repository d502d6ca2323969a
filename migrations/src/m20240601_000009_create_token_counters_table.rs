use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per calendar day; bumped atomically inside the intake
        // transaction so tokens stay collision-free across server instances.
        manager
            .create_table(
                Table::create()
                    .table(TokenCounters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TokenCounters::DayKey)
                            .string()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenCounters::LastSeq)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TokenCounters::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TokenCounters {
    Table,
    DayKey,
    LastSeq,
}
