use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod delivery;
pub mod doc;
pub mod health;
pub mod measurements;
pub mod orders;
pub mod params;
pub mod payments;
pub mod products;
pub mod schools;
pub mod tailor;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/schools", schools::router())
        .nest("/products", products::router())
        .nest("/measurements", measurements::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/payments", payments::router())
        .nest("/tailor", tailor::router())
        .nest("/delivery", delivery::router())
        .nest("/orders", orders::route())
        .nest("/admin", admin::router())
}
