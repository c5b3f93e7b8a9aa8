use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithLines},
    entity::{
        order_lines::{Column as LineCol, Entity as OrderLines},
        orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderLine},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn with_lines(state: &AppState, order: OrderModel) -> AppResult<OrderWithLines> {
    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order.id))
        .order_by_asc(LineCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderLine::from)
        .collect();
    Ok(OrderWithLines {
        order: order.into(),
        lines,
    })
}

/// Public tracking lookup by order code.
pub async fn get_by_code(
    state: &AppState,
    order_code: &str,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = Orders::find()
        .filter(OrderCol::OrderCode.eq(order_code.trim().to_uppercase()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    Ok(ApiResponse::success("OK", with_lines(state, order).await?, Some(Meta::empty())))
}

pub async fn find_order(state: &AppState, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))
}

/// Page through orders matching `condition`, honouring the query's status
/// filter and sort order.
pub async fn list_where(
    state: &AppState,
    mut condition: Condition,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn list_my_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    list_where(
        state,
        Condition::all().add(OrderCol::UserId.eq(user.user_id)),
        query,
    )
    .await
}
