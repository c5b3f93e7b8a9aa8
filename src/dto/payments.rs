use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, Payment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecutePaymentRequest {
    pub payment_id: String,
    pub payer_id: String,
    pub order_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelPaymentRequest {
    pub order_id: Uuid,
}

fn default_method() -> String {
    "card".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiatePaymentRequest {
    pub order_id: Uuid,
    pub order_code: String,
    #[serde(default = "default_method")]
    pub method: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentConfirmation {
    pub message: String,
    pub order: Order,
    pub payment: Payment,
    /// False when no approved tailor serves the order's school yet.
    pub tailor_assigned: bool,
}

/// Gateway webhook body; only the fields the receiver acts on are typed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEvent {
    pub event_type: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub resource: Value,
}

impl WebhookEvent {
    pub fn parent_payment(&self) -> Option<&str> {
        self.resource.get("parent_payment").and_then(Value::as_str)
    }

    pub fn sale_id(&self) -> Option<&str> {
        self.resource.get("id").and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_parent_payment_from_sale_resource() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "event_type": "PAYMENT.SALE.COMPLETED",
            "resource": { "id": "SALE-1", "parent_payment": "PAY-9" }
        }))
        .unwrap();
        assert_eq!(event.parent_payment(), Some("PAY-9"));
        assert_eq!(event.sale_id(), Some("SALE-1"));
    }

    #[test]
    fn tolerates_events_without_resource() {
        let event: WebhookEvent =
            serde_json::from_value(json!({ "event_type": "BILLING.PLAN.CREATED" })).unwrap();
        assert_eq!(event.parent_payment(), None);
    }
}
