use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::payments::{
        CancelPaymentRequest, ExecutePaymentRequest, InitiatePaymentRequest, PaymentConfirmation,
        WebhookAck, WebhookEvent,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments, Model as PaymentModel},
        schools::Entity as Schools,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus, Payment, PaymentStatus},
    notifications::{self, OrderSummary},
    response::{ApiResponse, Meta},
    services::{assignment_service, checkout_service::PAYMENT_METHOD_PAYPAL},
    state::AppState,
};

pub const SALE_COMPLETED_EVENT: &str = "PAYMENT.SALE.COMPLETED";

async fn find_order(state: &AppState, order_id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))
}

async fn find_payment(state: &AppState, order_id: Uuid) -> AppResult<Option<PaymentModel>> {
    Ok(Payments::find()
        .filter(PaymentCol::OrderId.eq(order_id))
        .one(&state.orm)
        .await?)
}

fn ensure_payable(order: &OrderModel) -> AppResult<()> {
    match order.status {
        OrderStatus::Pending => Ok(()),
        OrderStatus::Cancelled => Err(AppError::bad_request("Order has been cancelled")),
        _ => Err(AppError::bad_request("Order already paid")),
    }
}

/// Mark an order paid: confirm it, complete its payment, assign a tailor,
/// then notify the tailor and the customer once the writes are committed.
pub async fn confirm_payment(
    state: &AppState,
    order_id: Uuid,
    method: &str,
    transaction_id: Option<String>,
    actor: Option<Uuid>,
) -> AppResult<PaymentConfirmation> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    ensure_payable(&order)?;

    let now = Utc::now();
    let existing = Payments::find()
        .filter(PaymentCol::OrderId.eq(order.id))
        .one(&txn)
        .await?;
    let payment = match existing {
        Some(payment) => {
            let mut active: PaymentActive = payment.into();
            active.status = Set(PaymentStatus::Completed);
            active.method = Set(method.to_string());
            if transaction_id.is_some() {
                active.transaction_id = Set(transaction_id);
            }
            active.updated_at = Set(now.into());
            active.update(&txn).await?
        }
        None => {
            PaymentActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                amount: Set(order.total_amount),
                method: Set(method.to_string()),
                transaction_id: Set(transaction_id),
                status: Set(PaymentStatus::Completed),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };

    let mut active: OrderActive = order.clone().into();
    active.status = Set(OrderStatus::Confirmed);
    active.updated_at = Set(now.into());
    let assignment = assignment_service::assign(&txn, &order, &mut active, now).await?;
    let order = active.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        order_id = %order.id,
        order_code = %order.order_code,
        status = order.status.as_str(),
        "payment completed"
    );

    audit::record(
        state,
        actor,
        "payment_completed",
        "payments",
        serde_json::json!({ "order_id": order.id, "payment_id": payment.id, "method": payment.method }),
    )
    .await;

    let school_name = Schools::find_by_id(order.school_id)
        .one(&state.orm)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();

    if let Some(assignment) = &assignment {
        assignment_service::notify_tailor(state, assignment, &order, &school_name).await?;
    }

    let summary = OrderSummary {
        order_code: &order.order_code,
        school_name: &school_name,
        student_name: order.student_name.as_deref(),
        total_amount: order.total_amount,
        deadline: order.deadline.map(|d| d.with_timezone(&Utc)),
    };
    let email = notifications::customer_payment_received(
        &state.config,
        &order.customer_email,
        &order.customer_name,
        &summary,
    );
    state.mailer.send(&email).await?;

    Ok(PaymentConfirmation {
        message: "Payment successful".into(),
        tailor_assigned: assignment.is_some(),
        order: order.into(),
        payment: payment.into(),
    })
}

pub async fn execute_payment(
    state: &AppState,
    payload: ExecutePaymentRequest,
) -> AppResult<ApiResponse<PaymentConfirmation>> {
    let order = find_order(state, payload.order_id).await?;
    let payment = find_payment(state, order.id).await?;
    if payment
        .as_ref()
        .is_some_and(|p| p.status == PaymentStatus::Completed)
    {
        return Err(AppError::bad_request("Order already paid"));
    }
    ensure_payable(&order)?;
    if let Some(expected) = payment.as_ref().and_then(|p| p.transaction_id.as_deref()) {
        if expected != payload.payment_id {
            return Err(AppError::bad_request("Payment does not belong to this order"));
        }
    }

    let executed = match state
        .gateway
        .execute_payment(&payload.payment_id, &payload.payer_id)
        .await
    {
        Ok(executed) => executed,
        Err(err) => {
            tracing::warn!(error = %err, order_code = %order.order_code, "payment execution failed");
            return Err(AppError::bad_request("Payment execution failed"));
        }
    };

    let confirmation = confirm_payment(
        state,
        order.id,
        PAYMENT_METHOD_PAYPAL,
        Some(executed.transaction_id),
        order.user_id,
    )
    .await?;
    Ok(ApiResponse::success("Payment successful", confirmation, None))
}

pub async fn cancel_payment(
    state: &AppState,
    payload: CancelPaymentRequest,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(payload.order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    if order.status != OrderStatus::Pending {
        return Err(AppError::bad_request("Only pending orders can be cancelled"));
    }

    let now = Utc::now();
    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled);
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    if let Some(payment) = Payments::find()
        .filter(PaymentCol::OrderId.eq(order.id))
        .one(&txn)
        .await?
    {
        let mut active: PaymentActive = payment.into();
        active.status = Set(PaymentStatus::Cancelled);
        active.updated_at = Set(now.into());
        active.update(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(order_id = %order.id, order_code = %order.order_code, "order cancelled");

    audit::record(
        state,
        order.user_id,
        "payment_cancelled",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment cancelled",
        order.into(),
        Some(Meta::empty()),
    ))
}

/// Manual capture for payments taken outside the gateway (cash, card on site).
pub async fn initiate_payment(
    state: &AppState,
    user: &AuthUser,
    payload: InitiatePaymentRequest,
) -> AppResult<ApiResponse<PaymentConfirmation>> {
    ensure_admin(user)?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(payload.order_id))
                .add(OrderCol::OrderCode.eq(payload.order_code.trim())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let method = payload.method.trim();
    if method.is_empty() {
        return Err(AppError::bad_request("method is required"));
    }

    let confirmation = confirm_payment(state, order.id, method, None, Some(user.user_id)).await?;
    Ok(ApiResponse::success("Payment recorded", confirmation, None))
}

pub async fn payment_status(
    state: &AppState,
    order_code: &str,
) -> AppResult<ApiResponse<Payment>> {
    let order = Orders::find()
        .filter(OrderCol::OrderCode.eq(order_code.trim().to_uppercase()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    let payment = find_payment(state, order.id)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;
    Ok(ApiResponse::success("Payment status", payment.into(), None))
}

pub fn check_webhook_token(state: &AppState, presented: Option<&str>) -> AppResult<()> {
    match &state.config.webhook_token {
        Some(expected) if presented != Some(expected.as_str()) => {
            Err(AppError::forbidden("Invalid webhook token"))
        }
        _ => Ok(()),
    }
}

/// Events with a valid token are always acknowledged. The order is confirmed
/// only when the gateway itself reports the named sale as completed for the
/// payment opened at checkout.
pub async fn handle_webhook(
    state: &AppState,
    presented_token: Option<&str>,
    event: WebhookEvent,
) -> AppResult<WebhookAck> {
    check_webhook_token(state, presented_token)?;

    let event_type = event.event_type.as_deref().unwrap_or("unknown");
    match (event_type, event.parent_payment(), event.sale_id()) {
        (SALE_COMPLETED_EVENT, Some(gateway_payment), Some(sale_id)) => {
            let pending = Payments::find()
                .filter(
                    Condition::all()
                        .add(PaymentCol::TransactionId.eq(gateway_payment))
                        .add(PaymentCol::Status.eq(PaymentStatus::Pending)),
                )
                .one(&state.orm)
                .await?;
            let Some(payment) = pending else {
                tracing::info!(gateway_payment, "webhook for unknown or settled payment");
                return Ok(webhook_ack());
            };

            let sale = match state.gateway.sale_details(sale_id).await {
                Ok(sale) => sale,
                Err(err) => {
                    tracing::warn!(error = %err, sale_id, "webhook sale lookup failed");
                    return Ok(webhook_ack());
                }
            };
            if !sale.is_completed() || sale.parent_payment.as_deref() != Some(gateway_payment) {
                tracing::warn!(
                    sale_id,
                    gateway_payment,
                    sale_state = %sale.state,
                    "webhook sale does not settle the pending payment"
                );
                return Ok(webhook_ack());
            }

            confirm_payment(
                state,
                payment.order_id,
                PAYMENT_METHOD_PAYPAL,
                Some(sale.sale_id),
                None,
            )
            .await?;
        }
        _ => {
            tracing::info!(event_type, "webhook event acknowledged");
        }
    }

    Ok(webhook_ack())
}

fn webhook_ack() -> WebhookAck {
    WebhookAck {
        status: "webhook received".into(),
    }
}
