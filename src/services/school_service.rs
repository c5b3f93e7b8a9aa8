use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit,
    dto::schools::{CreateSchoolRequest, SchoolList, UpdateSchoolRequest},
    entity::schools::{ActiveModel, Column, Entity as Schools, Model as SchoolModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::School,
    response::{ApiResponse, Meta},
    routes::params::SchoolQuery,
    state::AppState,
};

pub async fn list_schools(
    state: &AppState,
    query: SchoolQuery,
) -> AppResult<ApiResponse<SchoolList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(Column::IsActive.eq(true));

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Town).ilike(pattern.clone()))
                .add(Expr::col(Column::Province).ilike(pattern)),
        );
    }

    let finder = Schools::find()
        .filter(condition)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(School::from)
        .collect();

    Ok(ApiResponse::success(
        "Schools",
        SchoolList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Public lookup; inactive schools are hidden.
pub async fn get_active_school(state: &AppState, id: Uuid) -> AppResult<ApiResponse<School>> {
    let school = Schools::find_by_id(id)
        .filter(Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("School"))?;
    Ok(ApiResponse::success("School", school.into(), None))
}

pub async fn find_school(state: &AppState, id: Uuid) -> AppResult<SchoolModel> {
    Schools::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("School"))
}

pub async fn get_school_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<School>> {
    ensure_admin(user)?;
    let school = find_school(state, id).await?;
    Ok(ApiResponse::success("School", school.into(), None))
}

pub async fn create_school(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSchoolRequest,
) -> AppResult<ApiResponse<School>> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("School name is required"));
    }

    let school = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        address: Set(payload.address),
        town: Set(payload.town),
        province: Set(payload.province),
        is_active: Set(payload.is_active),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "school_create",
        "schools",
        serde_json::json!({ "school_id": school.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "School created",
        school.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_school(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSchoolRequest,
) -> AppResult<ApiResponse<School>> {
    ensure_admin(user)?;
    let existing = find_school(state, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("School name is required"));
        }
        active.name = Set(name);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(town) = payload.town {
        active.town = Set(Some(town));
    }
    if let Some(province) = payload.province {
        active.province = Set(Some(province));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let school = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "school_update",
        "schools",
        serde_json::json!({ "school_id": school.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", school.into(), Some(Meta::empty())))
}
