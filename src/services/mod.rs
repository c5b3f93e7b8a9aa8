pub mod admin_service;
pub mod assignment_service;
pub mod auth_service;
pub mod cart_service;
pub mod checkout_service;
pub mod delivery_service;
pub mod measurement_service;
pub mod order_service;
pub mod payment_service;
pub mod product_service;
pub mod school_service;
pub mod tailor_service;
