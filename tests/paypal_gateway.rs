use serde_json::json;
use uniform_orders_api::{
    config::PaypalConfig,
    payments::{PaymentError, PaymentGateway, PaymentRequest, PaypalGateway},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn gateway(server: &MockServer) -> PaypalGateway {
    PaypalGateway::new(&PaypalConfig {
        base_url: server.uri(),
        client_id: "client".into(),
        client_secret: "secret".into(),
        currency: "USD".into(),
    })
    .unwrap()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A21AA",
            "token_type": "Bearer",
            "expires_in": 32400
        })))
        .mount(server)
        .await;
}

fn request() -> PaymentRequest {
    PaymentRequest {
        amount: 45050,
        currency: "USD".into(),
        description: "Payment for order AB12CD34".into(),
        custom: "6b1f0a52-8d0e-4c55-9d55-9f0c3c1f4a11".into(),
        return_url: "https://uniforms.test/payment/success/".into(),
        cancel_url: "https://uniforms.test/payment/cancel/".into(),
    }
}

#[tokio::test]
async fn create_payment_returns_approval_url() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment"))
        .and(header("authorization", "Bearer A21AA"))
        .and(body_partial_json(json!({
            "intent": "sale",
            "payer": { "payment_method": "paypal" },
            "redirect_urls": { "return_url": "https://uniforms.test/payment/success/" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "PAYID-123",
            "state": "created",
            "links": [
                { "href": "https://api.sandbox.paypal.com/v1/payments/payment/PAYID-123", "rel": "self" },
                { "href": "https://www.sandbox.paypal.com/checkoutnow?token=EC-1", "rel": "approval_url" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway(&server).create_payment(&request()).await.unwrap();
    assert_eq!(created.payment_id, "PAYID-123");
    assert_eq!(
        created.approval_url,
        "https://www.sandbox.paypal.com/checkoutnow?token=EC-1"
    );
}

#[tokio::test]
async fn create_payment_without_approval_link_fails() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "PAYID-124",
            "state": "created",
            "links": []
        })))
        .mount(&server)
        .await;

    let err = gateway(&server).create_payment(&request()).await.unwrap_err();
    assert!(matches!(err, PaymentError::MissingApprovalUrl));
}

#[tokio::test]
async fn rejected_credentials_surface_as_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let err = gateway(&server).create_payment(&request()).await.unwrap_err();
    match err {
        PaymentError::Rejected(detail) => assert!(detail.contains("401")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn execute_payment_reads_sale_id() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment/PAYID-123/execute"))
        .and(body_partial_json(json!({ "payer_id": "PAYER-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "PAYID-123",
            "state": "approved",
            "transactions": [{
                "related_resources": [{ "sale": { "id": "SALE-77", "state": "completed" } }]
            }]
        })))
        .mount(&server)
        .await;

    let executed = gateway(&server)
        .execute_payment("PAYID-123", "PAYER-9")
        .await
        .unwrap();
    assert_eq!(executed.payment_id, "PAYID-123");
    assert_eq!(executed.transaction_id, "SALE-77");
}

#[tokio::test]
async fn execute_payment_requires_approved_state() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment/PAYID-125/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "PAYID-125",
            "state": "failed"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .execute_payment("PAYID-125", "PAYER-9")
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Rejected(_)));
}

#[tokio::test]
async fn sale_details_reads_state_and_parent_payment() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/payments/sale/SALE-77"))
        .and(header("authorization", "Bearer A21AA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "SALE-77",
            "state": "completed",
            "parent_payment": "PAYID-123",
            "amount": { "total": "450.50", "currency": "USD" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sale = gateway(&server).sale_details("SALE-77").await.unwrap();
    assert_eq!(sale.sale_id, "SALE-77");
    assert_eq!(sale.parent_payment.as_deref(), Some("PAYID-123"));
    assert!(sale.is_completed());
}

#[tokio::test]
async fn unknown_sale_is_rejected() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/payments/sale/SALE-FORGED"))
        .respond_with(ResponseTemplate::new(404).set_body_string("INVALID_RESOURCE_ID"))
        .mount(&server)
        .await;

    let err = gateway(&server).sale_details("SALE-FORGED").await.unwrap_err();
    match err {
        PaymentError::Rejected(detail) => assert!(detail.contains("404")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn pending_sale_is_not_completed() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/payments/sale/SALE-78"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "SALE-78",
            "state": "pending",
            "parent_payment": "PAYID-126"
        })))
        .mount(&server)
        .await;

    let sale = gateway(&server).sale_details("SALE-78").await.unwrap();
    assert!(!sale.is_completed());
}
