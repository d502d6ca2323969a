pub mod charges;
pub mod common;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod payments;
pub mod repairs;
pub mod staff;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub repairs: Arc<crate::services::repairs::RepairService>,
    pub charges: Arc<crate::services::charges::ChargeService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub payments: Arc<crate::services::payments::PaymentService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub staff: Arc<crate::services::staff::StaffService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, events: EventSender) -> Self {
        Self {
            repairs: Arc::new(crate::services::repairs::RepairService::new(
                db.clone(),
                events.clone(),
            )),
            charges: Arc::new(crate::services::charges::ChargeService::new(
                db.clone(),
                events.clone(),
            )),
            inventory: Arc::new(crate::services::inventory::InventoryService::new(
                db.clone(),
                events.clone(),
            )),
            payments: Arc::new(crate::services::payments::PaymentService::new(
                db.clone(),
                events,
            )),
            customers: Arc::new(crate::services::customers::CustomerService::new(db.clone())),
            staff: Arc::new(crate::services::staff::StaffService::new(db)),
        }
    }
}
