use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryUsages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryUsages::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryUsages::RepairId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryUsages::InventoryItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryUsages::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryUsages::UnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryUsages::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(InventoryUsages::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryUsages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InventoryUsages {
    Table,
    Id,
    RepairId,
    InventoryItemId,
    Quantity,
    UnitPrice,
    CreatedBy,
    CreatedAt,
}
