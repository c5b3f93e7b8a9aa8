use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{ApprovalRequest, DeliveryPartnerList, TailorList, UserList},
        auth::{
            DeliveryRegisterRequest, LoginRequest, LoginResponse, MessageResponse,
            RegisterRequest, ResendVerificationRequest, TailorRegisterRequest, UserType,
            VerifyEmailRequest,
        },
        cart::{AddCartItemRequest, CartItemResponse, CartLine, CartView, UpdateCartItemRequest},
        checkout::{CheckoutRequest, CheckoutResponse},
        orders::{
            AssignShipmentRequest, ConfirmOrderResponse, OrderList, OrderWithLines, ShipmentList,
            UpdateOrderStatusRequest, UpdateShipmentStatusRequest,
        },
        payments::{
            CancelPaymentRequest, ExecutePaymentRequest, InitiatePaymentRequest,
            PaymentConfirmation, WebhookAck, WebhookEvent,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        schools::{CreateSchoolRequest, SchoolList, UpdateSchoolRequest},
    },
    measurements::{MeasurementField, MeasurementTemplate},
    models::{
        CartItem, DeliveryPartnerProfile, GarmentType, Order, OrderLine, OrderStatus, Payment,
        PaymentStatus, Product, School, Shipment, ShipmentStatus, StudentGender, StudentInfo,
        TailorProfile, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, checkout, delivery, health, measurements, orders, params, payments,
        products as product_routes, schools, tailor,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
        auth::register_tailor,
        auth::register_delivery,
        auth::verify_email,
        auth::resend_verification,
        schools::list_schools,
        schools::get_school,
        schools::list_school_products,
        schools::create_school,
        schools::get_school_admin,
        schools::update_school,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        measurements::template,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        checkout::checkout,
        payments::execute_payment,
        payments::cancel_payment,
        payments::initiate_payment,
        payments::payment_status,
        payments::webhook,
        tailor::confirm_order,
        tailor::list_orders,
        tailor::update_order_status,
        delivery::list_shipments,
        delivery::update_shipment_status,
        orders::list_order,
        orders::get_order,
        admin::list_users,
        admin::list_tailors,
        admin::set_tailor_approval,
        admin::list_delivery_partners,
        admin::set_delivery_approval,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::assign_shipment
    ),
    components(
        schemas(
            User,
            School,
            Product,
            StudentInfo,
            CartItem,
            Order,
            OrderLine,
            TailorProfile,
            DeliveryPartnerProfile,
            Shipment,
            Payment,
            GarmentType,
            OrderStatus,
            ShipmentStatus,
            PaymentStatus,
            StudentGender,
            MeasurementField,
            MeasurementTemplate,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            TailorRegisterRequest,
            DeliveryRegisterRequest,
            VerifyEmailRequest,
            ResendVerificationRequest,
            MessageResponse,
            UserType,
            CreateSchoolRequest,
            UpdateSchoolRequest,
            SchoolList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            AddCartItemRequest,
            UpdateCartItemRequest,
            CartLine,
            CartView,
            CartItemResponse,
            CheckoutRequest,
            CheckoutResponse,
            ExecutePaymentRequest,
            CancelPaymentRequest,
            InitiatePaymentRequest,
            PaymentConfirmation,
            WebhookEvent,
            WebhookAck,
            OrderList,
            OrderWithLines,
            UpdateOrderStatusRequest,
            ConfirmOrderResponse,
            UpdateShipmentStatusRequest,
            ShipmentList,
            AssignShipmentRequest,
            UserList,
            TailorList,
            DeliveryPartnerList,
            ApprovalRequest,
            params::Pagination,
            params::SortOrder,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and email verification"),
        (name = "Schools", description = "School directory"),
        (name = "Products", description = "Uniform catalogue"),
        (name = "Measurements", description = "Garment measurement templates"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Checkout", description = "Turn a cart into an order"),
        (name = "Payments", description = "Gateway payments and webhooks"),
        (name = "Tailor", description = "Tailor order handling"),
        (name = "Delivery", description = "Delivery partner shipments"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
