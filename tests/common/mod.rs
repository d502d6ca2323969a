#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::mpsc;
use uuid::Uuid;

use repairhub_api::{
    config::AppConfig,
    db,
    entities::{inventory_item, repair, staff},
    events::{process_events, EventSender},
    handlers::AppServices,
    services::inventory::CreateInventoryItemRequest,
    services::repairs::{CustomerInput, DeviceInput, IntakeOutcome, IntakeRequest},
    services::staff::CreateStaffRequest,
};

pub struct TestApp {
    pub db: Arc<db::DbPool>,
    pub services: AppServices,
}

/// In-memory SQLite database with the real migrator, wired to the full
/// service stack. A single pooled connection keeps every test task on the
/// same in-memory database.
pub async fn spawn_app() -> TestApp {
    let cfg = AppConfig::for_database("sqlite::memory:");
    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .expect("failed to connect to in-memory database");
    db::run_migrations(&pool).await.expect("migrations failed");

    let db = Arc::new(pool);
    let (tx, rx) = mpsc::channel(256);
    let events = EventSender::new(tx);
    tokio::spawn(process_events(rx));

    let services = AppServices::new(db.clone(), events);
    TestApp { db, services }
}

pub async fn seed_staff(app: &TestApp, name: &str, commission_rate: Decimal) -> staff::Model {
    app.services
        .staff
        .create(CreateStaffRequest {
            name: name.to_string(),
            role: "technician".to_string(),
            commission_rate,
        })
        .await
        .expect("failed to seed staff")
}

pub async fn seed_item(
    app: &TestApp,
    name: &str,
    quantity: i32,
    unit_price: Decimal,
) -> inventory_item::Model {
    app.services
        .inventory
        .create_item(CreateInventoryItemRequest {
            name: name.to_string(),
            sku: None,
            quantity,
            unit_price,
        })
        .await
        .expect("failed to seed inventory item")
}

pub fn intake_request(customer_name: &str, flat_charge: Decimal) -> IntakeRequest {
    IntakeRequest {
        customer: CustomerInput {
            id: None,
            name: customer_name.to_string(),
            phone: Some("0300-1234567".to_string()),
            email: None,
            address: None,
        },
        device: DeviceInput {
            brand: Some("Acme".to_string()),
            model: Some("PhoneX".to_string()),
            serial_number: None,
            description: Some("cracked screen".to_string()),
            category: Some("phone".to_string()),
        },
        intake_notes: Some("does not power on".to_string()),
        flat_charge,
        assigned_staff_id: None,
        actor_id: None,
    }
}

pub async fn intake_with_flat(app: &TestApp, flat_charge: Decimal) -> IntakeOutcome {
    app.services
        .repairs
        .intake(intake_request("Walk-in Customer", flat_charge))
        .await
        .expect("intake failed")
}

/// Re-reads a repair directly, bypassing the service layer.
pub async fn reload_repair(app: &TestApp, repair_id: Uuid) -> repair::Model {
    use sea_orm::EntityTrait;
    repair::Entity::find_by_id(repair_id)
        .one(&*app.db)
        .await
        .expect("query failed")
        .expect("repair missing")
}

/// Drives a repair from INTAKE to REPAIRED so payments can follow.
pub async fn advance_to_repaired(app: &TestApp, repair_id: Uuid) {
    for status in ["TO_REPAIR", "IN_REPAIR", "REPAIRED"] {
        app.services
            .repairs
            .update_status(repair_id, status)
            .await
            .expect("transition failed");
    }
}
