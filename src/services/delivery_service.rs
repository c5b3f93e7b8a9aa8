use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{ShipmentList, UpdateShipmentStatusRequest},
    entity::{
        delivery_partner_profiles::{Column as DeliveryCol, Entity as DeliveryProfiles},
        orders::{ActiveModel as OrderActive, Entity as Orders},
        shipments::{ActiveModel as ShipmentActive, Column as ShipmentCol, Entity as Shipments},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderStatus, Shipment, ShipmentStatus},
    response::{ApiResponse, Meta},
    routes::params::PageQuery,
    state::AppState,
};

const MAX_TRACKING_CODE_LEN: usize = 20;

/// Trimmed tracking code; blank input means no change.
fn tracking_code(raw: Option<String>) -> AppResult<Option<String>> {
    let Some(code) = raw.map(|c| c.trim().to_string()) else {
        return Ok(None);
    };
    if code.is_empty() {
        return Ok(None);
    }
    if code.chars().count() > MAX_TRACKING_CODE_LEN {
        return Err(AppError::bad_request(format!(
            "tracking_code must be at most {MAX_TRACKING_CODE_LEN} characters"
        )));
    }
    Ok(Some(code))
}

async fn has_profile(state: &AppState, user_id: Uuid) -> AppResult<bool> {
    Ok(DeliveryProfiles::find()
        .filter(DeliveryCol::UserId.eq(user_id))
        .count(&state.orm)
        .await?
        > 0)
}

/// Order status that mirrors a shipment reaching `status`, if any.
fn mirrored_order_status(status: ShipmentStatus) -> Option<OrderStatus> {
    match status {
        ShipmentStatus::PickedUp => Some(OrderStatus::Shipped),
        ShipmentStatus::Delivered => Some(OrderStatus::Delivered),
        _ => None,
    }
}

pub async fn list_shipments(
    state: &AppState,
    user: &AuthUser,
    query: PageQuery,
) -> AppResult<ApiResponse<ShipmentList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if !has_profile(state, user.user_id).await? {
        return Ok(ApiResponse::success(
            "Ok",
            ShipmentList { items: Vec::new() },
            Some(Meta::new(page, limit, 0)),
        ));
    }

    let finder = Shipments::find()
        .filter(ShipmentCol::DeliveryPartnerId.eq(user.user_id))
        .order_by_desc(ShipmentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Shipment::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ShipmentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_shipment_status(
    state: &AppState,
    user: &AuthUser,
    shipment_id: Uuid,
    payload: UpdateShipmentStatusRequest,
) -> AppResult<ApiResponse<Shipment>> {
    if !has_profile(state, user.user_id).await? {
        return Err(AppError::forbidden(
            "Only delivery partners can update shipment status",
        ));
    }
    let tracking = tracking_code(payload.tracking_code)?;

    let txn = state.orm.begin().await?;
    let shipment = Shipments::find_by_id(shipment_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Shipment"))?;

    if shipment.delivery_partner_id != Some(user.user_id) {
        return Err(AppError::forbidden("Shipment is assigned to someone else"));
    }

    let next = payload.status;
    if shipment.status.next_for_delivery() != Some(next) {
        return Err(AppError::bad_request(format!(
            "Cannot move shipment from {} to {}",
            shipment.status.as_str(),
            next.as_str()
        )));
    }

    let now = Utc::now();
    let order_id = shipment.order_id;
    let mut active: ShipmentActive = shipment.into();
    active.status = Set(next);
    active.updated_at = Set(now.into());
    match next {
        ShipmentStatus::PickedUp => active.picked_up_at = Set(Some(now.into())),
        ShipmentStatus::Delivered => active.delivered_at = Set(Some(now.into())),
        _ => {}
    }
    if tracking.is_some() {
        active.tracking_code = Set(tracking);
    }
    let shipment = active.update(&txn).await?;

    if let Some(order_status) = mirrored_order_status(next) {
        let order = Orders::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Order"))?;
        let mut order: OrderActive = order.into();
        order.status = Set(order_status);
        order.updated_at = Set(now.into());
        order.update(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(
        shipment_id = %shipment.id,
        order_id = %order_id,
        status = shipment.status.as_str(),
        "shipment status updated"
    );

    audit::record(
        state,
        Some(user.user_id),
        "shipment_status",
        "shipments",
        serde_json::json!({ "shipment_id": shipment.id, "status": shipment.status.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Shipment status updated",
        shipment.into(),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickup_and_delivery_drive_order_status() {
        assert_eq!(
            mirrored_order_status(ShipmentStatus::PickedUp),
            Some(OrderStatus::Shipped)
        );
        assert_eq!(
            mirrored_order_status(ShipmentStatus::Delivered),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(mirrored_order_status(ShipmentStatus::InTransit), None);
    }

    #[test]
    fn tracking_code_is_trimmed_and_bounded() {
        assert_eq!(tracking_code(Some(" TRK-1 ".into())).unwrap().as_deref(), Some("TRK-1"));
        assert_eq!(tracking_code(Some("   ".into())).unwrap(), None);
        assert_eq!(tracking_code(None).unwrap(), None);
        assert!(matches!(
            tracking_code(Some("T".repeat(MAX_TRACKING_CODE_LEN + 1))),
            Err(AppError::BadRequest(_))
        ));
    }
}
