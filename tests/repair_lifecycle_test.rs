mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use repairhub_api::errors::ServiceError;
use repairhub_api::services::repairs::{CustomerInput, IntakeRequest};

#[tokio::test]
async fn intake_seeds_flat_charge_and_total() {
    let app = common::spawn_app().await;

    let outcome = common::intake_with_flat(&app, dec!(500)).await;

    assert_eq!(outcome.repair.status, "INTAKE");
    assert_eq!(outcome.repair.total_charges, dec!(500));
    assert!(!outcome.repair.is_locked);
    assert_eq!(outcome.repair.staff_share_amount, dec!(0));
    assert_eq!(outcome.repair.shop_share_amount, dec!(0));

    let charges = app
        .services
        .charges
        .list_for_repair(outcome.repair.id)
        .await
        .unwrap();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].kind, "FLAT");
    assert_eq!(charges[0].amount, dec!(500));
    assert_eq!(charges[0].description, "Intake flat charge");
}

#[tokio::test]
async fn intake_without_flat_charge_leaves_ledger_empty() {
    let app = common::spawn_app().await;

    let outcome = common::intake_with_flat(&app, dec!(0)).await;

    assert_eq!(outcome.repair.total_charges, dec!(0));
    let charges = app
        .services
        .charges
        .list_for_repair(outcome.repair.id)
        .await
        .unwrap();
    assert!(charges.is_empty());
}

#[tokio::test]
async fn intake_token_has_prefix_date_and_sequence() {
    let app = common::spawn_app().await;

    let first = common::intake_with_flat(&app, dec!(0)).await;
    let second = common::intake_with_flat(&app, dec!(0)).await;

    let pattern = regex::Regex::new(r"^RS\d{6}\d{4}$").unwrap();
    assert!(pattern.is_match(&first.repair.token), "{}", first.repair.token);
    assert!(pattern.is_match(&second.repair.token));
    assert!(
        second.repair.token > first.repair.token,
        "tokens must be strictly increasing within a day"
    );
}

#[tokio::test]
async fn intake_reuses_existing_customer() {
    let app = common::spawn_app().await;

    let first = common::intake_with_flat(&app, dec!(0)).await;

    let mut request = common::intake_request("Ignored Name", dec!(0));
    request.customer = CustomerInput {
        id: Some(first.customer.id),
        name: "Ignored Name".to_string(),
        phone: None,
        email: None,
        address: None,
    };
    let second = app.services.repairs.intake(request).await.unwrap();

    assert_eq!(second.customer.id, first.customer.id);
    assert_eq!(second.customer.name, first.customer.name);
}

#[tokio::test]
async fn intake_with_unresolvable_customer_id_creates_new_customer() {
    let app = common::spawn_app().await;

    let mut request = common::intake_request("Fresh Customer", dec!(0));
    request.customer.id = Some(Uuid::new_v4());
    let outcome = app.services.repairs.intake(request).await.unwrap();

    assert_eq!(outcome.customer.name, "Fresh Customer");
}

#[tokio::test]
async fn intake_requires_customer_name() {
    let app = common::spawn_app().await;

    let request = IntakeRequest {
        customer: CustomerInput {
            id: None,
            name: "   ".to_string(),
            phone: None,
            email: None,
            address: None,
        },
        device: Default::default(),
        intake_notes: None,
        flat_charge: dec!(0),
        assigned_staff_id: None,
        actor_id: None,
    };

    let result = app.services.repairs.intake(request).await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn full_lifecycle_stamps_each_milestone() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let id = outcome.repair.id;

    let repair = app
        .services
        .repairs
        .update_status(id, "TO_REPAIR")
        .await
        .unwrap();
    assert_eq!(repair.status, "TO_REPAIR");
    assert!(repair.to_repair_at.is_some());
    assert!(repair.in_repair_at.is_none());

    let repair = app
        .services
        .repairs
        .update_status(id, "IN_REPAIR")
        .await
        .unwrap();
    assert!(repair.in_repair_at.is_some());
    assert!(repair.completed_at.is_none());

    let repair = app
        .services
        .repairs
        .update_status(id, "REPAIRED")
        .await
        .unwrap();
    assert!(repair.completed_at.is_some());
    assert!(repair.delivered_at.is_none());

    let repair = app
        .services
        .repairs
        .update_status(id, "DELIVERED")
        .await
        .unwrap();
    assert_eq!(repair.status, "DELIVERED");
    assert!(repair.delivered_at.is_some());
    assert!(repair.intake_at <= repair.delivered_at.unwrap());
}

#[tokio::test]
async fn unrepairable_branch_also_stamps_completion() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let id = outcome.repair.id;

    app.services
        .repairs
        .update_status(id, "TO_REPAIR")
        .await
        .unwrap();
    app.services
        .repairs
        .update_status(id, "IN_REPAIR")
        .await
        .unwrap();
    let repair = app
        .services
        .repairs
        .update_status(id, "UNREPAIRABLE")
        .await
        .unwrap();

    assert_eq!(repair.status, "UNREPAIRABLE");
    assert!(repair.completed_at.is_some());
}

#[tokio::test]
async fn reversal_edge_keeps_prior_milestones() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let id = outcome.repair.id;

    app.services
        .repairs
        .update_status(id, "TO_REPAIR")
        .await
        .unwrap();
    let reverted = app
        .services
        .repairs
        .update_status(id, "INTAKE")
        .await
        .unwrap();

    assert_eq!(reverted.status, "INTAKE");
    assert!(
        reverted.to_repair_at.is_some(),
        "milestone timestamps are never cleared"
    );
}

#[tokio::test]
async fn delivered_is_terminal() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let id = outcome.repair.id;

    common::advance_to_repaired(&app, id).await;
    app.services
        .repairs
        .update_status(id, "DELIVERED")
        .await
        .unwrap();

    for requested in ["INTAKE", "TO_REPAIR", "IN_REPAIR", "REPAIRED", "UNREPAIRABLE"] {
        let result = app.services.repairs.update_status(id, requested).await;
        assert_matches!(result, Err(ServiceError::IllegalTransition { .. }));
    }

    let repair = common::reload_repair(&app, id).await;
    assert_eq!(repair.status, "DELIVERED");
}

#[tokio::test]
async fn illegal_transition_leaves_status_unchanged() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;
    let id = outcome.repair.id;

    let result = app.services.repairs.update_status(id, "DELIVERED").await;
    assert_matches!(
        result,
        Err(ServiceError::IllegalTransition { ref from, ref to })
            if from == "INTAKE" && to == "DELIVERED"
    );

    let repair = common::reload_repair(&app, id).await;
    assert_eq!(repair.status, "INTAKE");
    assert!(repair.delivered_at.is_none());
}

#[tokio::test]
async fn unknown_status_is_rejected_before_lookup() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;

    let result = app
        .services
        .repairs
        .update_status(outcome.repair.id, "SHIPPED")
        .await;
    assert_matches!(result, Err(ServiceError::InvalidStatus(s)) if s == "SHIPPED");
}

#[tokio::test]
async fn transition_on_missing_repair_is_not_found() {
    let app = common::spawn_app().await;

    let result = app
        .services
        .repairs
        .update_status(Uuid::new_v4(), "TO_REPAIR")
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn repairs_are_retrievable_by_token() {
    let app = common::spawn_app().await;
    let outcome = common::intake_with_flat(&app, dec!(0)).await;

    let by_token = app
        .services
        .repairs
        .get_by_token(&outcome.repair.token)
        .await
        .unwrap();
    assert_eq!(by_token.id, outcome.repair.id);

    let missing = app.services.repairs.get_by_token("RS0000000000").await;
    assert_matches!(missing, Err(ServiceError::NotFound(_)));
}
