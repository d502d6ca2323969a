pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_customers_table;
mod m20240601_000002_create_devices_table;
mod m20240601_000003_create_staff_table;
mod m20240601_000004_create_inventory_items_table;
mod m20240601_000005_create_repairs_table;
mod m20240601_000006_create_inventory_usages_table;
mod m20240601_000007_create_charges_table;
mod m20240601_000008_create_payments_table;
mod m20240601_000009_create_token_counters_table;
mod m20240815_000010_add_billing_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_customers_table::Migration),
            Box::new(m20240601_000002_create_devices_table::Migration),
            Box::new(m20240601_000003_create_staff_table::Migration),
            Box::new(m20240601_000004_create_inventory_items_table::Migration),
            Box::new(m20240601_000005_create_repairs_table::Migration),
            Box::new(m20240601_000006_create_inventory_usages_table::Migration),
            Box::new(m20240601_000007_create_charges_table::Migration),
            Box::new(m20240601_000008_create_payments_table::Migration),
            Box::new(m20240601_000009_create_token_counters_table::Migration),
            Box::new(m20240815_000010_add_billing_indexes::Migration),
        ]
    }
}
