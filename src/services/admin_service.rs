use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        admin::{ApprovalRequest, DeliveryPartnerList, TailorList, UserList},
        orders::{AssignShipmentRequest, OrderList, OrderWithLines, UpdateOrderStatusRequest},
    },
    entity::{
        delivery_partner_profiles::{
            ActiveModel as DeliveryActive, Column as DeliveryCol, Entity as DeliveryProfiles,
        },
        orders::{ActiveModel as OrderActive, Entity as Orders},
        shipments::{ActiveModel as ShipmentActive, Entity as Shipments},
        tailor_profiles::{ActiveModel as TailorActive, Column as TailorCol, Entity as TailorProfiles},
        tailor_schools::{Column as TailorSchoolCol, Entity as TailorSchools},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{DeliveryPartnerProfile, Order, Shipment, ShipmentStatus, TailorProfile, User},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, ProfileListQuery, UserListQuery},
    services::order_service,
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(role) = query.role.as_ref().filter(|r| !r.is_empty()) {
        condition = condition.add(UserCol::Role.eq(role.as_str()));
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(UserCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn list_tailors(
    state: &AppState,
    user: &AuthUser,
    query: ProfileListQuery,
) -> AppResult<ApiResponse<TailorList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(approved) = query.is_approved {
        condition = condition.add(TailorCol::IsApproved.eq(approved));
    }

    let finder = TailorProfiles::find()
        .filter(condition)
        .order_by_asc(TailorCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let profiles = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let profile_ids: Vec<Uuid> = profiles.iter().map(|p| p.id).collect();
    let mut schools: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    if !profile_ids.is_empty() {
        for link in TailorSchools::find()
            .filter(TailorSchoolCol::TailorProfileId.is_in(profile_ids))
            .all(&state.orm)
            .await?
        {
            schools
                .entry(link.tailor_profile_id)
                .or_default()
                .push(link.school_id);
        }
    }

    let items = profiles
        .into_iter()
        .map(|p| {
            let school_ids = schools.remove(&p.id).unwrap_or_default();
            TailorProfile::from_entity(p, school_ids)
        })
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        TailorList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn list_delivery_partners(
    state: &AppState,
    user: &AuthUser,
    query: ProfileListQuery,
) -> AppResult<ApiResponse<DeliveryPartnerList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(approved) = query.is_approved {
        condition = condition.add(DeliveryCol::IsApproved.eq(approved));
    }

    let finder = DeliveryProfiles::find()
        .filter(condition)
        .order_by_asc(DeliveryCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(DeliveryPartnerProfile::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        DeliveryPartnerList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn set_tailor_approval(
    state: &AppState,
    user: &AuthUser,
    profile_id: Uuid,
    payload: ApprovalRequest,
) -> AppResult<ApiResponse<TailorProfile>> {
    ensure_admin(user)?;
    let profile = TailorProfiles::find_by_id(profile_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Tailor profile"))?;

    let mut active: TailorActive = profile.into();
    active.is_approved = Set(payload.is_approved);
    let profile = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "tailor_approval",
        "tailor_profiles",
        serde_json::json!({ "profile_id": profile.id, "is_approved": profile.is_approved }),
    )
    .await;

    let school_ids = TailorSchools::find()
        .filter(TailorSchoolCol::TailorProfileId.eq(profile.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|link| link.school_id)
        .collect();

    Ok(ApiResponse::success(
        "Updated",
        TailorProfile::from_entity(profile, school_ids),
        Some(Meta::empty()),
    ))
}

pub async fn set_delivery_approval(
    state: &AppState,
    user: &AuthUser,
    profile_id: Uuid,
    payload: ApprovalRequest,
) -> AppResult<ApiResponse<DeliveryPartnerProfile>> {
    ensure_admin(user)?;
    let profile = DeliveryProfiles::find_by_id(profile_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Delivery partner profile"))?;

    let mut active: DeliveryActive = profile.into();
    active.is_approved = Set(payload.is_approved);
    let profile = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "delivery_approval",
        "delivery_partner_profiles",
        serde_json::json!({ "profile_id": profile.id, "is_approved": profile.is_approved }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        profile.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    order_service::list_where(state, Condition::all(), query).await
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    ensure_admin(user)?;
    let order = order_service::find_order(state, id).await?;
    Ok(ApiResponse::success(
        "OK",
        order_service::with_lines(state, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = order_service::find_order(state, id).await?;
    let previous = order.status;

    let mut active: OrderActive = order.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;
    tracing::info!(
        order_id = %order.id,
        order_code = %order.order_code,
        from = previous.as_str(),
        status = order.status.as_str(),
        "admin set order status"
    );

    audit::record(
        state,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order status updated",
        order.into(),
        Some(Meta::empty()),
    ))
}

pub async fn assign_shipment(
    state: &AppState,
    user: &AuthUser,
    shipment_id: Uuid,
    payload: AssignShipmentRequest,
) -> AppResult<ApiResponse<Shipment>> {
    ensure_admin(user)?;

    let approved = DeliveryProfiles::find()
        .filter(
            Condition::all()
                .add(DeliveryCol::UserId.eq(payload.delivery_partner_id))
                .add(DeliveryCol::IsApproved.eq(true)),
        )
        .count(&state.orm)
        .await?
        > 0;
    if !approved {
        return Err(AppError::bad_request(
            "Delivery partner not found or not approved",
        ));
    }

    let txn = state.orm.begin().await?;
    let shipment = Shipments::find_by_id(shipment_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Shipment"))?;

    if shipment.status != ShipmentStatus::Pending {
        return Err(AppError::bad_request("Shipment is already assigned"));
    }

    let now = Utc::now();
    let order_id = shipment.order_id;
    let mut active: ShipmentActive = shipment.into();
    active.status = Set(ShipmentStatus::Assigned);
    active.delivery_partner_id = Set(Some(payload.delivery_partner_id));
    active.updated_at = Set(now.into());
    let shipment = active.update(&txn).await?;

    let order = Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    let mut order: OrderActive = order.into();
    order.delivery_partner_id = Set(Some(payload.delivery_partner_id));
    order.updated_at = Set(now.into());
    order.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        shipment_id = %shipment.id,
        order_id = %order_id,
        delivery_partner_id = %payload.delivery_partner_id,
        "shipment assigned"
    );

    audit::record(
        state,
        Some(user.user_id),
        "shipment_assign",
        "shipments",
        serde_json::json!({
            "shipment_id": shipment.id,
            "delivery_partner_id": payload.delivery_partner_id,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Shipment assigned",
        shipment.into(),
        Some(Meta::empty()),
    ))
}
