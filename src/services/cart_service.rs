use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{AddCartItemRequest, CartItemResponse, CartLine, CartView, UpdateCartItemRequest},
    entity::{
        cart_items::{
            ActiveModel as CartItemActive, Column as ItemCol, Entity as CartItems,
            Model as CartItemModel,
        },
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    measurements::validate_measurements,
    middleware::auth::CartOwner,
    models::{CartItem, StudentInfo},
    response::{ApiResponse, Meta},
    services::product_service,
    state::AppState,
};

const MAX_SESSION_KEY_LEN: usize = 64;
/// Upper bound for one cart line, merged quantities included.
pub const MAX_ITEM_QUANTITY: i32 = 1000;

fn check_quantity(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::bad_request("quantity must be greater than 0"));
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(AppError::bad_request(format!(
            "quantity must be at most {MAX_ITEM_QUANTITY}"
        )));
    }
    Ok(())
}

/// Price times quantity, refusing amounts that do not fit the total column.
pub fn line_total(price: i64, quantity: i32) -> AppResult<i64> {
    price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::bad_request("Order total is too large"))
}

/// Sum of line totals with the same overflow guard as [`line_total`].
pub fn add_to_total(total: i64, line: i64) -> AppResult<i64> {
    total
        .checked_add(line)
        .ok_or_else(|| AppError::bad_request("Order total is too large"))
}

fn owner_user_id(owner: &CartOwner) -> Option<Uuid> {
    match owner {
        CartOwner::User(id) => Some(*id),
        _ => None,
    }
}

pub async fn find_cart<C: ConnectionTrait>(
    conn: &C,
    owner: &CartOwner,
) -> AppResult<Option<CartModel>> {
    let cart = match owner {
        CartOwner::User(user_id) => {
            Carts::find()
                .filter(CartCol::UserId.eq(*user_id))
                .one(conn)
                .await?
        }
        CartOwner::Session(key) => {
            Carts::find()
                .filter(CartCol::SessionKey.eq(key.as_str()))
                .one(conn)
                .await?
        }
        CartOwner::Anonymous => None,
    };
    Ok(cart)
}

/// Resolve the caller's cart, creating it (and minting a session key for
/// anonymous callers) when it does not exist yet.
async fn get_or_create_cart(state: &AppState, owner: &CartOwner) -> AppResult<CartModel> {
    if let Some(cart) = find_cart(&state.orm, owner).await? {
        return Ok(cart);
    }

    let session_key = match owner {
        CartOwner::User(_) => None,
        CartOwner::Session(key) => {
            if key.len() > MAX_SESSION_KEY_LEN {
                return Err(AppError::bad_request("Invalid cart session key"));
            }
            Some(key.clone())
        }
        CartOwner::Anonymous => Some(Uuid::new_v4().simple().to_string()),
    };

    let cart = CartActive {
        id: Set(Uuid::new_v4()),
        session_key: Set(session_key),
        user_id: Set(owner_user_id(owner)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    tracing::debug!(cart_id = %cart.id, "cart created");
    Ok(cart)
}

async fn touch_cart(state: &AppState, cart: CartModel) -> AppResult<()> {
    let mut active: CartActive = cart.into();
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;
    Ok(())
}

pub async fn get_cart(state: &AppState, owner: &CartOwner) -> AppResult<ApiResponse<CartView>> {
    let cart = get_or_create_cart(state, owner).await?;

    let rows = CartItems::find()
        .filter(ItemCol::CartId.eq(cart.id))
        .order_by_asc(ItemCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let mut total = 0i64;
    let mut items = Vec::with_capacity(rows.len());
    for (item, product) in rows {
        let Some(product) = product else { continue };
        let line = line_total(product.price, item.quantity)?;
        total = add_to_total(total, line)?;
        items.push(CartLine {
            item: item.into(),
            product_name: product.name,
            unit_price: product.price,
            line_total: line,
        });
    }

    Ok(ApiResponse::success(
        "Cart",
        CartView {
            cart_id: cart.id,
            session_key: cart.session_key,
            items,
            total,
        },
        Some(Meta::empty()),
    ))
}

pub async fn add_item(
    state: &AppState,
    owner: &CartOwner,
    payload: AddCartItemRequest,
) -> AppResult<ApiResponse<CartItemResponse>> {
    check_quantity(payload.quantity)?;
    payload.student.validate().map_err(AppError::BadRequest)?;
    let product = product_service::find_product(state, payload.product_id).await?;
    validate_measurements(product.garment_type, &payload.measurements)
        .map_err(AppError::BadRequest)?;

    let cart = get_or_create_cart(state, owner).await?;

    let mut same_line = Condition::all()
        .add(ItemCol::CartId.eq(cart.id))
        .add(ItemCol::ProductId.eq(product.id));
    same_line = match payload.student.student_name.as_deref() {
        Some(name) => same_line.add(ItemCol::StudentName.eq(name)),
        None => same_line.add(ItemCol::StudentName.is_null()),
    };
    let existing = CartItems::find().filter(same_line).one(&state.orm).await?;

    let item = if let Some(item) = existing {
        let quantity = item
            .quantity
            .checked_add(payload.quantity)
            .ok_or_else(|| AppError::bad_request("quantity is too large"))?;
        check_quantity(quantity)?;
        let mut active: CartItemActive = item.into();
        active.quantity = Set(quantity);
        active.update(&state.orm).await?
    } else {
        let student = payload.student;
        CartItemActive {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart.id),
            product_id: Set(product.id),
            quantity: Set(payload.quantity),
            measurements: Set(payload.measurements),
            student_name: Set(student.student_name),
            student_age: Set(student.student_age),
            student_grade: Set(student.student_grade),
            student_gender: Set(student.student_gender),
            student_height: Set(student.student_height),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    let session_key = cart.session_key.clone();
    touch_cart(state, cart).await?;

    audit::record(
        state,
        owner_user_id(owner),
        "cart_add",
        "cart_items",
        serde_json::json!({ "product_id": item.product_id, "quantity": item.quantity }),
    )
    .await;

    Ok(ApiResponse::success(
        "Item added to cart",
        CartItemResponse {
            session_key,
            item: item.into(),
        },
        None,
    ))
}

/// Load a cart item and check it belongs to the caller's cart.
async fn owned_item(
    state: &AppState,
    owner: &CartOwner,
    item_id: Uuid,
) -> AppResult<CartItemModel> {
    let item = CartItems::find_by_id(item_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart item"))?;

    let cart = find_cart(&state.orm, owner).await?;
    match cart {
        Some(cart) if cart.id == item.cart_id => Ok(item),
        _ => Err(AppError::forbidden("Cart item belongs to another cart")),
    }
}

pub async fn update_item(
    state: &AppState,
    owner: &CartOwner,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if let Some(quantity) = payload.quantity {
        check_quantity(quantity)?;
    }
    StudentInfo {
        student_name: payload.student_name.clone(),
        student_age: payload.student_age,
        student_grade: payload.student_grade.clone(),
        student_gender: payload.student_gender,
        student_height: payload.student_height,
    }
    .validate()
    .map_err(AppError::BadRequest)?;
    let item = owned_item(state, owner, item_id).await?;

    let mut active: CartItemActive = item.clone().into();
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(measurements) = payload.measurements {
        let product = product_service::find_product(state, item.product_id).await?;
        validate_measurements(product.garment_type, &measurements).map_err(AppError::BadRequest)?;
        active.measurements = Set(measurements);
    }
    if let Some(name) = payload.student_name {
        active.student_name = Set(Some(name));
    }
    if let Some(age) = payload.student_age {
        active.student_age = Set(Some(age));
    }
    if let Some(grade) = payload.student_grade {
        active.student_grade = Set(Some(grade));
    }
    if let Some(gender) = payload.student_gender {
        active.student_gender = Set(Some(gender));
    }
    if let Some(height) = payload.student_height {
        active.student_height = Set(Some(height));
    }

    let item = active.update(&state.orm).await?;

    audit::record(
        state,
        owner_user_id(owner),
        "cart_update",
        "cart_items",
        serde_json::json!({ "item_id": item.id, "quantity": item.quantity }),
    )
    .await;

    Ok(ApiResponse::success("Cart item updated", item.into(), None))
}

pub async fn remove_item(
    state: &AppState,
    owner: &CartOwner,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let item = owned_item(state, owner, item_id).await?;
    CartItems::delete_by_id(item.id).exec(&state.orm).await?;

    audit::record(
        state,
        owner_user_id(owner),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "item_id": item.id, "product_id": item.product_id }),
    )
    .await;

    Ok(ApiResponse::acknowledged("Removed from cart"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive_and_bounded() {
        assert!(check_quantity(1).is_ok());
        assert!(check_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(check_quantity(0), Err(AppError::BadRequest(_))));
        assert!(matches!(
            check_quantity(MAX_ITEM_QUANTITY + 1),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(check_quantity(i32::MAX), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn totals_overflow_is_a_bad_request() {
        assert_eq!(line_total(15000, 3).unwrap(), 45000);
        assert!(matches!(
            line_total(i64::MAX, 2),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            add_to_total(i64::MAX, 1),
            Err(AppError::BadRequest(_))
        ));
    }
}
