use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    codes,
    dto::checkout::{CheckoutRequest, CheckoutResponse},
    entity::{
        cart_items::{Column as ItemCol, Entity as CartItems},
        carts::Entity as Carts,
        order_lines::ActiveModel as OrderLineActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        payments::ActiveModel as PaymentActive,
        products::Entity as Products,
        schools::Entity as Schools,
    },
    error::{AppError, AppResult},
    middleware::auth::CartOwner,
    models::{OrderStatus, PaymentStatus},
    payments::PaymentRequest,
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

const ORDER_CODE_ATTEMPTS: usize = 10;
pub const PAYMENT_METHOD_PAYPAL: &str = "paypal";
const MAX_PHONE_LEN: usize = 20;

async fn unique_order_code<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    for _ in 0..ORDER_CODE_ATTEMPTS {
        let code = codes::order_code();
        let taken = Orders::find()
            .filter(OrderCol::OrderCode.eq(code.as_str()))
            .count(conn)
            .await?;
        if taken == 0 {
            return Ok(code);
        }
    }
    Err(AppError::Internal(anyhow::anyhow!(
        "could not generate a unique order code"
    )))
}

fn require(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn require_phone(value: &str) -> AppResult<String> {
    let phone = require("customer_phone", value)?;
    if phone.chars().count() > MAX_PHONE_LEN {
        return Err(AppError::bad_request(format!(
            "customer_phone must be at most {MAX_PHONE_LEN} characters"
        )));
    }
    Ok(phone)
}

pub fn payment_request(state: &AppState, order_id: Uuid, order_code: &str, total: i64) -> PaymentRequest {
    let frontend = &state.config.frontend_url;
    PaymentRequest {
        amount: total,
        currency: state.config.paypal.currency.clone(),
        description: format!("Payment for order {order_code}"),
        custom: order_id.to_string(),
        return_url: format!("{frontend}/payment/success/"),
        cancel_url: format!("{frontend}/payment/cancel/"),
    }
}

/// Turn the caller's cart into a pending order and open a gateway payment.
/// The whole conversion rolls back when the gateway refuses the payment.
pub async fn checkout(
    state: &AppState,
    owner: &CartOwner,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let customer_name = require("customer_name", &payload.customer_name)?;
    let customer_phone = require_phone(&payload.customer_phone)?;
    let customer_email = require("customer_email", &payload.customer_email)?;
    if !customer_email.contains('@') {
        return Err(AppError::bad_request("customer_email must be a valid email"));
    }
    payload.student.validate().map_err(AppError::BadRequest)?;

    let txn = state.orm.begin().await?;

    let cart = cart_service::find_cart(&txn, owner)
        .await?
        .ok_or_else(|| AppError::bad_request("Cart not found"))?;
    // Serialize concurrent checkouts of the same cart.
    Carts::find_by_id(cart.id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let rows = CartItems::find()
        .filter(ItemCol::CartId.eq(cart.id))
        .find_also_related(Products)
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::bad_request("Cart is empty"));
    }

    let school = Schools::find_by_id(payload.school_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("School"))?;

    let mut lines = Vec::with_capacity(rows.len());
    let mut total_amount: i64 = 0;
    for (item, product) in rows {
        let product = product.ok_or(AppError::NotFound("Product"))?;
        if product.school_id != school.id {
            return Err(AppError::bad_request(format!(
                "Product {} does not belong to the selected school",
                product.name
            )));
        }
        let line = cart_service::line_total(product.price, item.quantity)?;
        total_amount = cart_service::add_to_total(total_amount, line)?;
        lines.push((item, product.price));
    }

    let order_code = unique_order_code(&txn).await?;
    let student = payload.student;
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_code: Set(order_code),
        school_id: Set(school.id),
        user_id: Set(match owner {
            CartOwner::User(id) => Some(*id),
            _ => None,
        }),
        customer_name: Set(customer_name),
        customer_phone: Set(customer_phone),
        customer_email: Set(customer_email),
        student_name: Set(student.student_name),
        student_age: Set(student.student_age),
        student_grade: Set(student.student_grade),
        student_gender: Set(student.student_gender),
        student_height: Set(student.student_height),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending),
        tailor_id: Set(None),
        delivery_partner_id: Set(None),
        assigned_at: Set(None),
        deadline: Set(None),
        confirmation_token: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (item, price) in lines {
        OrderLineActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            price: Set(price),
            measurements: Set(item.measurements),
            student_name: Set(item.student_name),
            student_age: Set(item.student_age),
            student_grade: Set(item.student_grade),
            student_gender: Set(item.student_gender),
            student_height: Set(item.student_height),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    // cart items go with the cart
    Carts::delete_by_id(cart.id).exec(&txn).await?;

    let request = payment_request(state, order.id, &order.order_code, total_amount);
    let created = match state.gateway.create_payment(&request).await {
        Ok(created) => created,
        Err(err) => {
            tracing::warn!(error = %err, order_code = %order.order_code, "payment creation failed");
            txn.rollback().await?;
            return Err(err.into());
        }
    };

    PaymentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        amount: Set(total_amount),
        method: Set(PAYMENT_METHOD_PAYPAL.into()),
        transaction_id: Set(Some(created.payment_id.clone())),
        status: Set(PaymentStatus::Pending),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(
        order_id = %order.id,
        order_code = %order.order_code,
        total_amount,
        "order created"
    );

    audit::record(
        state,
        order.user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "order_code": order.order_code }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            order_id: order.id,
            order_code: order.order_code,
            total_amount,
            payment_id: created.payment_id,
            approval_url: created.approval_url,
            message: "Order created. Redirect to the approval URL to complete payment.".into(),
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_is_trimmed_and_bounded() {
        assert_eq!(require_phone("  0821234567 ").unwrap(), "0821234567");
        assert!(matches!(require_phone("   "), Err(AppError::BadRequest(_))));
        assert!(matches!(
            require_phone(&"0".repeat(25)),
            Err(AppError::BadRequest(_))
        ));
    }
}
