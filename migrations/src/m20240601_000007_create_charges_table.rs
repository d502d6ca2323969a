use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Charges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Charges::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Charges::RepairId).uuid().not_null())
                    .col(ColumnDef::new(Charges::Kind).string().not_null())
                    .col(ColumnDef::new(Charges::Description).string().not_null())
                    .col(ColumnDef::new(Charges::Amount).decimal().not_null())
                    .col(ColumnDef::new(Charges::InventoryUsageId).uuid().null())
                    .col(ColumnDef::new(Charges::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Charges::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Charges::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Charges {
    Table,
    Id,
    RepairId,
    Kind,
    Description,
    Amount,
    InventoryUsageId,
    CreatedBy,
    CreatedAt,
}
