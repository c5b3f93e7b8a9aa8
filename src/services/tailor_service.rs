use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{ConfirmOrderResponse, OrderList, UpdateOrderStatusRequest},
    entity::{
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        schools::Entity as Schools,
        shipments::{ActiveModel as ShipmentActive, Column as ShipmentCol, Entity as Shipments},
        tailor_profiles::{Column as TailorCol, Entity as TailorProfiles, Model as TailorModel},
        tailor_schools::{Column as TailorSchoolCol, Entity as TailorSchools},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus, ShipmentStatus},
    notifications::{self, OrderSummary},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub async fn find_profile(state: &AppState, user_id: Uuid) -> AppResult<Option<TailorModel>> {
    Ok(TailorProfiles::find()
        .filter(TailorCol::UserId.eq(user_id))
        .one(&state.orm)
        .await?)
}

pub async fn school_ids(state: &AppState, profile_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(TailorSchools::find()
        .filter(TailorSchoolCol::TailorProfileId.eq(profile_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|link| link.school_id)
        .collect())
}

/// Tell the customer production has started.
async fn notify_in_production(state: &AppState, order: &OrderModel) -> AppResult<()> {
    let school_name = Schools::find_by_id(order.school_id)
        .one(&state.orm)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();
    let summary = OrderSummary {
        order_code: &order.order_code,
        school_name: &school_name,
        student_name: order.student_name.as_deref(),
        total_amount: order.total_amount,
        deadline: order.deadline.map(|d| d.with_timezone(&Utc)),
    };
    let email = notifications::customer_in_production(
        &state.config,
        &order.customer_email,
        &order.customer_name,
        &summary,
    );
    state.mailer.send(&email).await?;
    Ok(())
}

/// Accept an assigned order through the emailed confirmation link.
pub async fn confirm_order(
    state: &AppState,
    token: &str,
) -> AppResult<ApiResponse<ConfirmOrderResponse>> {
    let order = Orders::find()
        .filter(OrderCol::ConfirmationToken.eq(token))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid confirmation token"))?;

    if order.status != OrderStatus::Confirmed {
        return Err(AppError::bad_request("Order is not awaiting confirmation"));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::InProduction);
    active.confirmation_token = Set(None);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;
    tracing::info!(
        order_id = %order.id,
        order_code = %order.order_code,
        status = order.status.as_str(),
        "order accepted by tailor"
    );

    audit::record(
        state,
        order.tailor_id,
        "order_confirmed_by_tailor",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    notify_in_production(state, &order).await?;
    let deadline = order.deadline.map(|d| d.with_timezone(&Utc));

    Ok(ApiResponse::success(
        "Order confirmed",
        ConfirmOrderResponse {
            message: "Order confirmed successfully. You have 7 days to complete this order."
                .into(),
            order_code: order.order_code,
            deadline,
        },
        None,
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let Some(profile) = find_profile(state, user.user_id).await? else {
        let (page, limit, _) = query.pagination().normalize();
        return Ok(ApiResponse::success(
            "Ok",
            OrderList { items: Vec::new() },
            Some(Meta::new(page, limit, 0)),
        ));
    };
    let schools = school_ids(state, profile.id).await?;

    order_service::list_where(
        state,
        Condition::all().add(OrderCol::SchoolId.is_in(schools)),
        query,
    )
    .await
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let profile = find_profile(state, user.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("Only tailors can update order status"))?;
    let schools = school_ids(state, profile.id).await?;

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    if !schools.contains(&order.school_id) {
        return Err(AppError::forbidden("Order belongs to a school you do not serve"));
    }

    let next = payload.status;
    if !order.status.tailor_can_move_to(next) {
        return Err(AppError::bad_request(format!(
            "Cannot move order from {} to {}",
            order.status.as_str(),
            next.as_str()
        )));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(next);
    if next == OrderStatus::InProduction {
        // accepting here retires the emailed link
        active.confirmation_token = Set(None);
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    if next == OrderStatus::Completed {
        let has_shipment = Shipments::find()
            .filter(ShipmentCol::OrderId.eq(order.id))
            .count(&txn)
            .await?
            > 0;
        if !has_shipment {
            ShipmentActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                delivery_partner_id: Set(None),
                status: Set(ShipmentStatus::Pending),
                tracking_code: Set(None),
                picked_up_at: Set(None),
                delivered_at: Set(None),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    tracing::info!(
        order_id = %order.id,
        order_code = %order.order_code,
        status = order.status.as_str(),
        "tailor updated order status"
    );

    audit::record(
        state,
        Some(user.user_id),
        "tailor_order_status",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status.as_str() }),
    )
    .await;

    if next == OrderStatus::InProduction {
        notify_in_production(state, &order).await?;
    }

    Ok(ApiResponse::success(
        "Order status updated",
        order.into(),
        Some(Meta::empty()),
    ))
}
