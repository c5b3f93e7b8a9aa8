use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{
    CreatedPayment, ExecutedPayment, PaymentError, PaymentGateway, PaymentRequest, SaleDetails,
    format_amount,
};
use crate::config::PaypalConfig;

/// PayPal REST (v1 payments) client.
pub struct PaypalGateway {
    base_url: String,
    client_id: String,
    client_secret: String,
    client: Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct CreatePaymentBody<'a> {
    intent: &'a str,
    payer: Payer<'a>,
    redirect_urls: RedirectUrls<'a>,
    transactions: Vec<Transaction<'a>>,
}

#[derive(Serialize)]
struct Payer<'a> {
    payment_method: &'a str,
}

#[derive(Serialize)]
struct RedirectUrls<'a> {
    return_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Serialize)]
struct Transaction<'a> {
    amount: Amount<'a>,
    description: &'a str,
    custom: &'a str,
}

#[derive(Serialize)]
struct Amount<'a> {
    total: String,
    currency: &'a str,
}

#[derive(Deserialize)]
struct PaymentResponse {
    id: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    transactions: Vec<ExecutedTransaction>,
}

#[derive(Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Deserialize)]
struct ExecutedTransaction {
    #[serde(default)]
    related_resources: Vec<RelatedResource>,
}

#[derive(Deserialize)]
struct RelatedResource {
    sale: Option<Sale>,
}

#[derive(Deserialize)]
struct Sale {
    id: String,
}

#[derive(Deserialize)]
struct SaleResponse {
    id: String,
    state: String,
    #[serde(default)]
    parent_payment: Option<String>,
}

#[derive(Serialize)]
struct ExecuteBody<'a> {
    payer_id: &'a str,
}

impl PaypalGateway {
    pub fn new(config: &PaypalConfig) -> Result<Self, PaymentError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &PaypalConfig, client: Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            client,
        }
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(PaymentError::Rejected(format!("{status}: {body}")))
}

#[async_trait]
impl PaymentGateway for PaypalGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<CreatedPayment, PaymentError> {
        let token = self.access_token().await?;
        let body = CreatePaymentBody {
            intent: "sale",
            payer: Payer {
                payment_method: "paypal",
            },
            redirect_urls: RedirectUrls {
                return_url: &request.return_url,
                cancel_url: &request.cancel_url,
            },
            transactions: vec![Transaction {
                amount: Amount {
                    total: format_amount(request.amount),
                    currency: &request.currency,
                },
                description: &request.description,
                custom: &request.custom,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/payments/payment", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let payment: PaymentResponse = ensure_success(response).await?.json().await?;

        let approval_url = payment
            .links
            .into_iter()
            .find(|link| link.rel == "approval_url")
            .map(|link| link.href)
            .ok_or(PaymentError::MissingApprovalUrl)?;

        tracing::debug!(payment_id = %payment.id, "paypal payment created");
        Ok(CreatedPayment {
            payment_id: payment.id,
            approval_url,
        })
    }

    async fn execute_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
    ) -> Result<ExecutedPayment, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(format!(
                "{}/v1/payments/payment/{}/execute",
                self.base_url, payment_id
            ))
            .bearer_auth(token)
            .json(&ExecuteBody { payer_id })
            .send()
            .await?;
        let payment: PaymentResponse = ensure_success(response).await?.json().await?;

        if payment.state.as_deref() != Some("approved") {
            return Err(PaymentError::Rejected(format!(
                "payment {} is {}",
                payment.id,
                payment.state.as_deref().unwrap_or("unknown")
            )));
        }

        let transaction_id = payment
            .transactions
            .iter()
            .flat_map(|t| t.related_resources.iter())
            .find_map(|r| r.sale.as_ref().map(|sale| sale.id.clone()))
            .unwrap_or_else(|| payment.id.clone());

        Ok(ExecutedPayment {
            payment_id: payment.id,
            transaction_id,
        })
    }

    async fn sale_details(&self, sale_id: &str) -> Result<SaleDetails, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(format!("{}/v1/payments/sale/{}", self.base_url, sale_id))
            .bearer_auth(token)
            .send()
            .await?;
        let sale: SaleResponse = ensure_success(response).await?.json().await?;

        Ok(SaleDetails {
            sale_id: sale.id,
            state: sale.state,
            parent_payment: sale.parent_payment,
        })
    }
}
