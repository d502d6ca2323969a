use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Devices::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Devices::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Devices::Brand).string().null())
                    .col(ColumnDef::new(Devices::Model).string().null())
                    .col(ColumnDef::new(Devices::SerialNumber).string().null())
                    .col(ColumnDef::new(Devices::Description).text().null())
                    .col(ColumnDef::new(Devices::Category).string().null())
                    .col(ColumnDef::new(Devices::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_customer_id")
                    .table(Devices::Table)
                    .col(Devices::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Devices {
    Table,
    Id,
    CustomerId,
    Brand,
    Model,
    SerialNumber,
    Description,
    Category,
    CreatedAt,
}
