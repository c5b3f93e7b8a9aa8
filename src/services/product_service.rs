use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        schools::{Column as SchoolCol, Entity as Schools},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    services::school_service,
    state::AppState,
};

fn sizes_value(sizes: Vec<String>) -> Option<serde_json::Value> {
    if sizes.is_empty() {
        None
    } else {
        Some(serde_json::json!(sizes))
    }
}

pub async fn find_product(state: &AppState, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))
}

/// Attach school names to a page of products with a single lookup.
async fn with_school_names(
    state: &AppState,
    products: Vec<ProductModel>,
) -> AppResult<Vec<Product>> {
    let mut school_ids: Vec<Uuid> = products.iter().map(|p| p.school_id).collect();
    school_ids.sort();
    school_ids.dedup();

    let names: HashMap<Uuid, String> = if school_ids.is_empty() {
        HashMap::new()
    } else {
        Schools::find()
            .filter(SchoolCol::Id.is_in(school_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect()
    };

    Ok(products
        .into_iter()
        .map(|p| {
            let name = names.get(&p.school_id).cloned();
            Product::from_entity(p, name)
        })
        .collect())
}

pub async fn list_school_products(
    state: &AppState,
    school_id: Uuid,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let school = school_service::find_school(state, school_id).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(Column::SchoolId.eq(school.id));
    if let Some(garment_type) = query.garment_type {
        condition = condition.add(Column::GarmentType.eq(garment_type));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| Product::from_entity(p, Some(school.name.clone())))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = find_product(state, id).await?;
    let mut items = with_school_names(state, vec![product]).await?;
    let product = items.pop().ok_or(AppError::NotFound("Product"))?;
    Ok(ApiResponse::success("Product", product, None))
}

fn product_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Product name is required"));
    }
    Ok(name.to_string())
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if payload.price < 0 {
        return Err(AppError::bad_request("price must not be negative"));
    }
    let name = product_name(&payload.name)?;
    let school = Schools::find_by_id(payload.school_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::bad_request("school not found"))?;

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        school_id: Set(school.id),
        name: Set(name),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        price: Set(payload.price),
        garment_type: Set(payload.garment_type),
        available_sizes: Set(sizes_value(payload.available_sizes)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from_entity(product, Some(school.name)),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = payload.name.as_deref().map(product_name).transpose()?;
    if payload.price.is_some_and(|price| price < 0) {
        return Err(AppError::bad_request("price must not be negative"));
    }
    let existing = find_product(state, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(garment_type) = payload.garment_type {
        active.garment_type = Set(Some(garment_type));
    }
    if let Some(sizes) = payload.available_sizes {
        active.available_sizes = Set(sizes_value(sizes));
    }

    let product = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    let mut items = with_school_names(state, vec![product]).await?;
    let product = items.pop().ok_or(AppError::NotFound("Product"))?;
    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product"));
    }

    audit::record(
        state,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::acknowledged("Deleted"))
}
