use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Audit events emitted by the service layer, one per mutating call.
///
/// Emission is fire-and-forget: the business transaction has already
/// committed by the time an event is sent, and a failed send is logged and
/// dropped rather than surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    RepairCreated {
        repair_id: Uuid,
        customer_id: Uuid,
        device_id: Uuid,
        token: String,
        flat_charge: Decimal,
    },
    RepairStatusChanged {
        repair_id: Uuid,
        from: String,
        to: String,
    },
    ChargeAdded {
        repair_id: Uuid,
        charge_id: Uuid,
        kind: String,
        amount: Decimal,
    },
    InventoryConsumed {
        repair_id: Uuid,
        inventory_item_id: Uuid,
        quantity: i32,
        charge_amount: Decimal,
    },
    PaymentRecorded {
        repair_id: Uuid,
        payment_id: Uuid,
        amount: Decimal,
        method: String,
        paid_total: Decimal,
        total_charges: Decimal,
        locked: bool,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel and writes each entry to the audit log.
///
/// Runs until every sender is dropped. Spawned once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::RepairCreated {
                repair_id,
                customer_id,
                device_id,
                token,
                flat_charge,
            } => {
                info!(
                    target: "audit",
                    %repair_id, %customer_id, %device_id, %token, %flat_charge,
                    "repair created"
                );
            }
            Event::RepairStatusChanged {
                repair_id,
                from,
                to,
            } => {
                info!(target: "audit", %repair_id, %from, %to, "repair status changed");
            }
            Event::ChargeAdded {
                repair_id,
                charge_id,
                kind,
                amount,
            } => {
                info!(target: "audit", %repair_id, %charge_id, %kind, %amount, "charge added");
            }
            Event::InventoryConsumed {
                repair_id,
                inventory_item_id,
                quantity,
                charge_amount,
            } => {
                info!(
                    target: "audit",
                    %repair_id, %inventory_item_id, %quantity, %charge_amount,
                    "inventory consumed"
                );
            }
            Event::PaymentRecorded {
                repair_id,
                payment_id,
                amount,
                method,
                paid_total,
                total_charges,
                locked,
            } => {
                info!(
                    target: "audit",
                    %repair_id, %payment_id, %amount, %method, %paid_total, %total_charges, %locked,
                    "payment recorded"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender
            .send(Event::RepairStatusChanged {
                repair_id: Uuid::new_v4(),
                from: "INTAKE".into(),
                to: "TO_REPAIR".into(),
            })
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::RepairStatusChanged { .. })
        ));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::ChargeAdded {
                repair_id: Uuid::new_v4(),
                charge_id: Uuid::new_v4(),
                kind: "FLAT".into(),
                amount: dec!(500),
            })
            .await;

        assert!(result.is_err());
    }
}
