use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repairs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Repairs::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Repairs::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Repairs::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Repairs::DeviceId).uuid().not_null())
                    .col(ColumnDef::new(Repairs::AssignedStaffId).uuid().null())
                    .col(
                        ColumnDef::new(Repairs::Status)
                            .string()
                            .not_null()
                            .default("INTAKE"),
                    )
                    .col(ColumnDef::new(Repairs::IntakeNotes).text().null())
                    .col(
                        ColumnDef::new(Repairs::FlatCharge)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Repairs::TotalCharges)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Repairs::StaffShareAmount)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Repairs::ShopShareAmount)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Repairs::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Repairs::IntakeAt).timestamp().not_null())
                    .col(ColumnDef::new(Repairs::ToRepairAt).timestamp().null())
                    .col(ColumnDef::new(Repairs::InRepairAt).timestamp().null())
                    .col(ColumnDef::new(Repairs::CompletedAt).timestamp().null())
                    .col(ColumnDef::new(Repairs::DeliveredAt).timestamp().null())
                    .col(ColumnDef::new(Repairs::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Repairs::UpdatedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Repairs::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Repairs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Repairs {
    Table,
    Id,
    Token,
    CustomerId,
    DeviceId,
    AssignedStaffId,
    Status,
    IntakeNotes,
    FlatCharge,
    TotalCharges,
    StaffShareAmount,
    ShopShareAmount,
    IsLocked,
    IntakeAt,
    ToRepairAt,
    InRepairAt,
    CompletedAt,
    DeliveredAt,
    CreatedAt,
    UpdatedAt,
    Version,
}
