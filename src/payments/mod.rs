//! Payment gateway seam.
//!
//! Checkout opens a payment with the gateway and hands the customer the
//! approval URL; once the customer approves, the payment is executed
//! (captured) and the order is confirmed.

use async_trait::async_trait;
use thiserror::Error;

pub mod paypal;

pub use paypal::PaypalGateway;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("gateway request failed: {0}")]
    Http(String),

    #[error("gateway rejected the request: {0}")]
    Rejected(String),

    #[error("gateway response had no approval url")]
    MissingApprovalUrl,
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Http(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    /// Opaque reference echoed back by the gateway, the order id.
    pub custom: String,
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPayment {
    pub payment_id: String,
    pub approval_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedPayment {
    pub payment_id: String,
    pub transaction_id: String,
}

/// A sale as the gateway records it, looked up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDetails {
    pub sale_id: String,
    pub state: String,
    /// The payment the sale settles.
    pub parent_payment: Option<String>,
}

impl SaleDetails {
    pub fn is_completed(&self) -> bool {
        self.state == "completed"
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<CreatedPayment, PaymentError>;

    async fn execute_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
    ) -> Result<ExecutedPayment, PaymentError>;

    /// Fetch a sale from the gateway. Webhook payloads are not trusted
    /// until the sale they name is confirmed here.
    async fn sale_details(&self, sale_id: &str) -> Result<SaleDetails, PaymentError>;
}

/// Render minor units as a decimal string, `1250` -> `"12.50"`.
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::format_amount;

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(1250), "12.50");
        assert_eq!(format_amount(-199), "-1.99");
    }
}
