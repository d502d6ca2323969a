mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use repairhub_api::entities::{charge, inventory_usage};
use repairhub_api::services::inventory::UseInventoryRequest;

/// Twenty concurrent single-unit consumptions against ten units of stock:
/// exactly ten succeed, the floor holds, and every success left a matched
/// usage/charge pair on the ledger.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_consumption_never_oversells() {
    let app = common::spawn_app().await;
    let item = common::seed_item(&app, "screen protector", 10, dec!(5.00)).await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let repair_id = outcome.repair.id;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let inventory = app.services.inventory.clone();
        let item_id = item.id;
        tasks.push(tokio::spawn(async move {
            inventory
                .use_inventory(
                    repair_id,
                    UseInventoryRequest {
                        inventory_item_id: item_id,
                        quantity: 1,
                        actor_id: None,
                    },
                )
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap_or(false) {
            successes += 1;
        }
    }

    assert_eq!(
        successes, 10,
        "exactly 10 consumptions should succeed; got {}",
        successes
    );

    let item = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item.quantity, 0, "stock must never go negative");

    let usages = inventory_usage::Entity::find()
        .filter(inventory_usage::Column::RepairId.eq(repair_id))
        .all(&*app.db)
        .await
        .unwrap();
    assert_eq!(usages.len(), 10);

    let charges = charge::Entity::find()
        .filter(charge::Column::RepairId.eq(repair_id))
        .all(&*app.db)
        .await
        .unwrap();
    assert_eq!(charges.len(), 10);

    let repair = common::reload_repair(&app, repair_id).await;
    assert_eq!(repair.total_charges, dec!(50.00));
}

/// A failed consumption commits nothing, so an identical retry starts from
/// clean state and succeeds once stock allows it.
#[tokio::test]
async fn failed_consumption_is_safely_retryable() {
    let app = common::spawn_app().await;
    let item = common::seed_item(&app, "flex cable", 1, dec!(15)).await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let repair_id = outcome.repair.id;

    let request = || UseInventoryRequest {
        inventory_item_id: item.id,
        quantity: 2,
        actor_id: None,
    };

    let first = app.services.inventory.use_inventory(repair_id, request()).await;
    assert!(first.is_err());

    let item_state = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item_state.quantity, 1, "nothing partial may commit");

    app.services.inventory.restock(item.id, 1).await.unwrap();

    let retry = app
        .services
        .inventory
        .use_inventory(repair_id, request())
        .await
        .unwrap();
    assert_eq!(retry.usage.quantity, 2);

    let item_state = app.services.inventory.get_item(item.id).await.unwrap();
    assert_eq!(item_state.quantity, 0);

    let repair = common::reload_repair(&app, repair_id).await;
    assert_eq!(repair.total_charges, dec!(30));
}
