use utoipa::OpenApi;

/// OpenAPI document for the core repair-shop operations.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health,
        crate::handlers::repairs::create_intake,
        crate::handlers::repairs::transition_status,
        crate::handlers::charges::add_charge,
        crate::handlers::payments::record_payment,
        crate::handlers::inventory::consume_inventory,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::repair::Model,
        crate::entities::customer::Model,
        crate::entities::device::Model,
        crate::entities::charge::Model,
        crate::entities::inventory_item::Model,
        crate::entities::inventory_usage::Model,
        crate::entities::payment::Model,
        crate::entities::staff::Model,
        crate::services::repairs::IntakeRequest,
        crate::services::repairs::CustomerInput,
        crate::services::repairs::DeviceInput,
        crate::services::repairs::IntakeOutcome,
        crate::services::charges::AddChargeRequest,
        crate::services::payments::RecordPaymentRequest,
        crate::services::payments::PaymentOutcome,
        crate::services::inventory::CreateInventoryItemRequest,
        crate::services::inventory::UseInventoryRequest,
        crate::services::inventory::InventoryUsageOutcome,
        crate::handlers::repairs::TransitionRequest,
        crate::handlers::inventory::RestockRequest,
    )),
    tags(
        (name = "Repairs", description = "Intake and repair lifecycle"),
        (name = "Charges", description = "Charge ledger"),
        (name = "Inventory", description = "Stock keeping and consumption"),
        (name = "Payments", description = "Payments and bill locking"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "RepairHub API",
        description = "Repair-shop management: intake, lifecycle, inventory, billing, payments"
    )
)]
pub struct ApiDoc;
