use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ledger recomputation and payment sums read by repair id on every
        // mutating call.
        manager
            .create_index(
                Index::create()
                    .name("idx_charges_repair_id")
                    .table(Charges::Table)
                    .col(Charges::RepairId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_repair_id")
                    .table(Payments::Table)
                    .col(Payments::RepairId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_usages_repair_id")
                    .table(InventoryUsages::Table)
                    .col(InventoryUsages::RepairId)
                    .to_owned(),
            )
            .await?;

        // Repair listings sort newest first; customer history filters by
        // customer id.
        manager
            .create_index(
                Index::create()
                    .name("idx_repairs_created_status")
                    .table(Repairs::Table)
                    .col((Repairs::CreatedAt, IndexOrder::Desc))
                    .col(Repairs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repairs_customer_id")
                    .table(Repairs::Table)
                    .col(Repairs::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_charges_repair_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payments_repair_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_inventory_usages_repair_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_repairs_created_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_repairs_customer_id").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Charges {
    Table,
    RepairId,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    RepairId,
}

#[derive(DeriveIden)]
enum InventoryUsages {
    Table,
    RepairId,
}

#[derive(DeriveIden)]
enum Repairs {
    Table,
    CustomerId,
    Status,
    CreatedAt,
}
