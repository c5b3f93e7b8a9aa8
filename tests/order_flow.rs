mod common;

use std::sync::Arc;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement,
};
use serde_json::json;
use uniform_orders_api::{
    db::{create_orm_conn, pool_from_orm, run_migrations},
    dto::{
        admin::ApprovalRequest,
        auth::{
            DeliveryRegisterRequest, PartnerAccountFields, TailorRegisterRequest, UserType,
            VerifyEmailRequest,
        },
        cart::{AddCartItemRequest, UpdateCartItemRequest},
        checkout::{CheckoutRequest, CheckoutResponse},
        orders::{AssignShipmentRequest, UpdateOrderStatusRequest, UpdateShipmentStatusRequest},
        payments::{
            CancelPaymentRequest, ExecutePaymentRequest, InitiatePaymentRequest, WebhookEvent,
        },
        products::CreateProductRequest,
        schools::CreateSchoolRequest,
    },
    entity::{
        carts::Entity as Carts,
        delivery_partner_profiles::{Column as DeliveryCol, Entity as DeliveryProfiles},
        orders::{Column as OrderCol, Entity as Orders},
        payments::{Column as PaymentCol, Entity as Payments},
        shipments::{Column as ShipmentCol, Entity as Shipments},
        tailor_profiles::{Column as TailorCol, Entity as TailorProfiles},
        users::ActiveModel as UserActive,
    },
    error::AppError,
    mail::MemoryMailer,
    middleware::auth::{AuthUser, CartOwner, ROLE_ADMIN, ROLE_DELIVERY, ROLE_TAILOR},
    models::{GarmentType, OrderStatus, PaymentStatus, ShipmentStatus, StudentInfo},
    payments::PaymentGateway,
    services::{
        admin_service, auth_service, cart_service, checkout_service, delivery_service,
        order_service, payment_service, product_service, school_service, tailor_service,
        cart_service::MAX_ITEM_QUANTITY,
        payment_service::SALE_COMPLETED_EVENT,
    },
    state::AppState,
};
use uuid::Uuid;

use common::{StubGateway, database_url, test_config};

// The scenarios share one database, so they run in sequence inside a single test.
#[tokio::test]
async fn uniform_order_lifecycle() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
        return Ok(());
    };

    paid_order_reaches_the_customer(&url).await?;
    gateway_failure_keeps_the_cart(&url).await?;
    cart_and_checkout_refusals(&url).await?;
    webhook_needs_a_settled_sale(&url).await?;
    tailor_status_updates(&url).await?;
    Ok(())
}

async fn paid_order_reaches_the_customer(url: &str) -> anyhow::Result<()> {
    let mailer = MemoryMailer::new();
    let gateway = Arc::new(StubGateway::default());
    let state = setup_state(url, mailer.clone(), gateway.clone()).await?;

    let admin = AuthUser {
        user_id: create_user(&state, ROLE_ADMIN, "admin@example.com").await?,
        role: ROLE_ADMIN.into(),
    };

    let mut schools = Vec::new();
    for name in ["Hillside Primary", "Lakeview High", "Oakridge College"] {
        let school = school_service::create_school(
            &state,
            &admin,
            CreateSchoolRequest {
                name: name.into(),
                address: "1 Main Road".into(),
                town: Some("Pretoria".into()),
                province: Some("Gauteng".into()),
                is_active: true,
            },
        )
        .await?
        .data
        .unwrap();
        schools.push(school.id);
    }
    let school_id = schools[0];

    let shirt = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            school_id,
            name: "White Shirt".into(),
            description: None,
            image_url: None,
            price: 15000,
            garment_type: Some(GarmentType::ShirtBlouse),
            available_sizes: vec!["S".into(), "M".into()],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(shirt.school_name.as_deref(), Some("Hillside Primary"));

    // Tailor signs up, verifies and gets approved.
    let registration = auth_service::register_tailor(
        &state,
        TailorRegisterRequest {
            account: partner_account("tailor@example.com", "8001015009087"),
            business_name: Some("Needle & Thread".into()),
            schools: schools.clone(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(registration.profile.school_ids.len(), 3);
    assert_eq!(mailer.sent_to("tailor@example.com").len(), 1);

    let code = TailorProfiles::find()
        .filter(TailorCol::Id.eq(registration.profile.id))
        .one(&state.orm)
        .await?
        .and_then(|p| p.email_verification_code)
        .unwrap();
    auth_service::verify_email(
        &state,
        VerifyEmailRequest {
            email: "tailor@example.com".into(),
            verification_code: code,
            user_type: UserType::Tailor,
        },
    )
    .await?;
    admin_service::set_tailor_approval(
        &state,
        &admin,
        registration.profile.id,
        ApprovalRequest { is_approved: true },
    )
    .await?;
    let tailor = AuthUser {
        user_id: registration.user.id,
        role: ROLE_TAILOR.into(),
    };

    // Anonymous shopper fills a cart; the second add merges into the first line.
    let owner = CartOwner::Session("browser-session-1".into());
    let student = StudentInfo {
        student_name: Some("Thandi".into()),
        student_age: Some(9),
        ..StudentInfo::default()
    };
    for quantity in [1, 2] {
        cart_service::add_item(
            &state,
            &owner,
            AddCartItemRequest {
                product_id: shirt.id,
                quantity,
                measurements: json!({ "neck_circumference": 30, "sleeve_length": "52.5" }),
                student: student.clone(),
            },
        )
        .await?;
    }
    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].item.quantity, 3);
    assert_eq!(cart.total, 45000);

    let checkout = checkout_service::checkout(
        &state,
        &owner,
        CheckoutRequest {
            school_id,
            customer_name: "Naledi Dube".into(),
            customer_phone: "0821234567".into(),
            customer_email: "naledi@example.com".into(),
            student,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(checkout.total_amount, 45000);
    assert_eq!(checkout.payment_id, "PAY-1");
    assert_eq!(gateway.created_count(), 1);
    assert!(cart_service::find_cart(&state.orm, &owner).await?.is_none());

    // A payment id from another checkout is refused.
    let err = payment_service::execute_payment(
        &state,
        ExecutePaymentRequest {
            payment_id: "PAY-999".into(),
            payer_id: "PAYER-1".into(),
            order_id: checkout.order_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let paid = payment_service::execute_payment(
        &state,
        ExecutePaymentRequest {
            payment_id: checkout.payment_id.clone(),
            payer_id: "PAYER-1".into(),
            order_id: checkout.order_id,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(paid.tailor_assigned);
    assert_eq!(paid.order.status, OrderStatus::Confirmed);
    assert_eq!(paid.order.tailor_id, Some(tailor.user_id));
    assert_eq!(paid.payment.transaction_id.as_deref(), Some("SALE-PAY-1"));
    assert_eq!(mailer.sent_to("tailor@example.com").len(), 2);
    assert_eq!(mailer.sent_to("naledi@example.com").len(), 1);

    let again = payment_service::execute_payment(
        &state,
        ExecutePaymentRequest {
            payment_id: checkout.payment_id.clone(),
            payer_id: "PAYER-1".into(),
            order_id: checkout.order_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(again, AppError::BadRequest(_)));

    // Tailor accepts through the emailed token, then finishes the order.
    let token = Orders::find()
        .filter(OrderCol::Id.eq(checkout.order_id))
        .one(&state.orm)
        .await?
        .and_then(|o| o.confirmation_token)
        .unwrap();
    let confirmed = tailor_service::confirm_order(&state, &token).await?.data.unwrap();
    assert_eq!(confirmed.order_code, checkout.order_code);
    assert!(confirmed.deadline.is_some());
    assert_eq!(mailer.sent_to("naledi@example.com").len(), 2);
    assert!(tailor_service::confirm_order(&state, &token).await.is_err());

    let tailor_orders = tailor_service::list_orders(&state, &tailor, Default::default())
        .await?
        .data
        .unwrap();
    assert_eq!(tailor_orders.items.len(), 1);

    let completed = tailor_service::update_order_status(
        &state,
        &tailor,
        checkout.order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Completed,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);

    let shipment = Shipments::find()
        .filter(ShipmentCol::OrderId.eq(checkout.order_id))
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Pending);

    // Delivery partner signs up and the admin hands over the shipment.
    let delivery = auth_service::register_delivery_partner(
        &state,
        DeliveryRegisterRequest {
            account: partner_account("driver@example.com", "9002025009088"),
            vehicle_type: Some("bakkie".into()),
            license_plate: Some("CA 123-456".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let unapproved = admin_service::assign_shipment(
        &state,
        &admin,
        shipment.id,
        AssignShipmentRequest {
            delivery_partner_id: delivery.user.id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(unapproved, AppError::BadRequest(_)));

    admin_service::set_delivery_approval(
        &state,
        &admin,
        delivery.profile.id,
        ApprovalRequest { is_approved: true },
    )
    .await?;
    let assigned = admin_service::assign_shipment(
        &state,
        &admin,
        shipment.id,
        AssignShipmentRequest {
            delivery_partner_id: delivery.user.id,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(assigned.status, ShipmentStatus::Assigned);

    let driver = AuthUser {
        user_id: delivery.user.id,
        role: ROLE_DELIVERY.into(),
    };
    let skipped = delivery_service::update_shipment_status(
        &state,
        &driver,
        shipment.id,
        UpdateShipmentStatusRequest {
            status: ShipmentStatus::Delivered,
            tracking_code: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(skipped, AppError::BadRequest(_)));

    for (status, tracking) in [
        (ShipmentStatus::PickedUp, Some("TRK-1".to_string())),
        (ShipmentStatus::InTransit, None),
        (ShipmentStatus::Delivered, None),
    ] {
        delivery_service::update_shipment_status(
            &state,
            &driver,
            shipment.id,
            UpdateShipmentStatusRequest {
                status,
                tracking_code: tracking,
            },
        )
        .await?;
    }

    let lookup = order_service::get_by_code(&state, &checkout.order_code.to_lowercase())
        .await?
        .data
        .unwrap();
    assert_eq!(lookup.order.status, OrderStatus::Delivered);
    assert_eq!(lookup.order.delivery_partner_id, Some(driver.user_id));
    assert_eq!(lookup.lines.len(), 1);
    assert_eq!(lookup.lines[0].price, 15000);
    assert_eq!(lookup.lines[0].quantity, 3);

    let delivered = Shipments::find_by_id(shipment.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(delivered.tracking_code.as_deref(), Some("TRK-1"));
    assert!(delivered.picked_up_at.is_some());
    assert!(delivered.delivered_at.is_some());

    let approved_partners = DeliveryProfiles::find()
        .filter(DeliveryCol::IsApproved.eq(true))
        .count(&state.orm)
        .await?;
    assert_eq!(approved_partners, 1);

    Ok(())
}

async fn gateway_failure_keeps_the_cart(url: &str) -> anyhow::Result<()> {
    let gateway = Arc::new(StubGateway::failing());
    let state = setup_state(url, MemoryMailer::new(), gateway).await?;

    let admin = AuthUser {
        user_id: create_user(&state, ROLE_ADMIN, "admin@example.com").await?,
        role: ROLE_ADMIN.into(),
    };
    let school = school_service::create_school(
        &state,
        &admin,
        CreateSchoolRequest {
            name: "Hillside Primary".into(),
            address: String::new(),
            town: None,
            province: None,
            is_active: true,
        },
    )
    .await?
    .data
    .unwrap();
    let tie = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            school_id: school.id,
            name: "Striped Tie".into(),
            description: None,
            image_url: None,
            price: 6000,
            garment_type: None,
            available_sizes: Vec::new(),
        },
    )
    .await?
    .data
    .unwrap();

    let owner = CartOwner::Session("browser-session-2".into());
    cart_service::add_item(
        &state,
        &owner,
        AddCartItemRequest {
            product_id: tie.id,
            quantity: 1,
            measurements: json!({}),
            student: StudentInfo::default(),
        },
    )
    .await?;

    let err = checkout_service::checkout(
        &state,
        &owner,
        CheckoutRequest {
            school_id: school.id,
            customer_name: "Naledi Dube".into(),
            customer_phone: "0821234567".into(),
            customer_email: "naledi@example.com".into(),
            student: StudentInfo::default(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));

    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    assert_eq!(Carts::find().count(&state.orm).await?, 1);
    Ok(())
}

async fn cart_and_checkout_refusals(url: &str) -> anyhow::Result<()> {
    let state = setup_state(url, MemoryMailer::new(), Arc::new(StubGateway::default())).await?;
    let admin = admin_user(&state).await?;
    let (school_id, product_id) = school_with_product(&state, &admin, "Hillside Primary").await?;

    // No cart at all, then a cart with nothing in it.
    let err = checkout_service::checkout(
        &state,
        &CartOwner::Session("never-shopped".into()),
        checkout_request(school_id),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart not found"));

    let empty = CartOwner::Session("empty-cart".into());
    cart_service::get_cart(&state, &empty).await?;
    let err = checkout_service::checkout(&state, &empty, checkout_request(school_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart is empty"));
    assert_eq!(Orders::find().count(&state.orm).await?, 0);

    // Merging past the line limit is refused and leaves the line untouched.
    let owner = CartOwner::Session("owner-cart".into());
    let item = cart_service::add_item(&state, &owner, cart_request(product_id, MAX_ITEM_QUANTITY))
        .await?
        .data
        .unwrap()
        .item;
    let err = cart_service::add_item(&state, &owner, cart_request(product_id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items[0].item.quantity, MAX_ITEM_QUANTITY);

    // Another shopper cannot touch the line.
    let stranger = CartOwner::Session("stranger-cart".into());
    cart_service::get_cart(&state, &stranger).await?;
    let err = cart_service::update_item(
        &state,
        &stranger,
        item.id,
        UpdateCartItemRequest {
            quantity: Some(2),
            ..UpdateCartItemRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = cart_service::remove_item(&state, &stranger, item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);

    // Only pending orders can be cancelled.
    let checkout = checkout_service::checkout(&state, &owner, checkout_request(school_id))
        .await?
        .data
        .unwrap();
    payment_service::initiate_payment(
        &state,
        &admin,
        InitiatePaymentRequest {
            order_id: checkout.order_id,
            order_code: checkout.order_code.clone(),
            method: "cash".into(),
        },
    )
    .await?;
    let err = payment_service::cancel_payment(
        &state,
        CancelPaymentRequest {
            order_id: checkout.order_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Only pending orders can be cancelled"));
    let order = Orders::find_by_id(checkout.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    Ok(())
}

async fn webhook_needs_a_settled_sale(url: &str) -> anyhow::Result<()> {
    let mailer = MemoryMailer::new();
    let gateway = Arc::new(StubGateway::default());
    let state = setup_state(url, mailer.clone(), gateway.clone()).await?;
    let admin = admin_user(&state).await?;
    let (school_id, product_id) = school_with_product(&state, &admin, "Lakeview High").await?;

    // Verified but never approved, so not eligible for assignment.
    partner_tailor(&state, &admin, "pending-tailor@example.com", &[school_id], false).await?;

    let checkout = place_order(&state, "webhook-cart", school_id, product_id).await?;
    assert_eq!(checkout.payment_id, "PAY-1");

    let sale_event = |sale_id: &str, parent: &str| WebhookEvent {
        event_type: Some(SALE_COMPLETED_EVENT.into()),
        resource: json!({ "id": sale_id, "parent_payment": parent, "state": "completed" }),
    };

    // The gateway knows nothing about this sale.
    payment_service::handle_webhook(&state, None, sale_event("SALE-FORGED", "PAY-1")).await?;
    // This sale settles a different payment.
    gateway.settle("SALE-OTHER", "PAY-77");
    payment_service::handle_webhook(&state, None, sale_event("SALE-OTHER", "PAY-1")).await?;

    let order = Orders::find_by_id(checkout.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(gateway.executed_count(), 0);
    assert!(mailer.sent_to("naledi@example.com").is_empty());

    gateway.settle("SALE-1", "PAY-1");
    payment_service::handle_webhook(&state, None, sale_event("SALE-1", "PAY-1")).await?;

    let order = Orders::find_by_id(checkout.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.tailor_id, None);
    let payment = Payments::find()
        .filter(PaymentCol::OrderId.eq(checkout.order_id))
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.transaction_id.as_deref(), Some("SALE-1"));
    assert_eq!(mailer.sent_to("naledi@example.com").len(), 1);

    // Redelivery is acknowledged without a second confirmation.
    payment_service::handle_webhook(&state, None, sale_event("SALE-1", "PAY-1")).await?;
    assert_eq!(mailer.sent_to("naledi@example.com").len(), 1);
    Ok(())
}

async fn tailor_status_updates(url: &str) -> anyhow::Result<()> {
    let mailer = MemoryMailer::new();
    let state = setup_state(url, mailer.clone(), Arc::new(StubGateway::default())).await?;
    let admin = admin_user(&state).await?;
    let (served, served_product) = school_with_product(&state, &admin, "Hillside Primary").await?;
    let (other, other_product) = school_with_product(&state, &admin, "Oakridge College").await?;
    let tailor = partner_tailor(&state, &admin, "tailor@example.com", &[served], true).await?;

    let mine = place_order(&state, "served-cart", served, served_product).await?;
    let paid = payment_service::execute_payment(
        &state,
        ExecutePaymentRequest {
            payment_id: mine.payment_id.clone(),
            payer_id: "PAYER-1".into(),
            order_id: mine.order_id,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid.order.tailor_id, Some(tailor.user_id));
    assert_eq!(mailer.sent_to("naledi@example.com").len(), 1);

    let started = tailor_service::update_order_status(
        &state,
        &tailor,
        mine.order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::InProduction,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(started.status, OrderStatus::InProduction);
    let order = Orders::find_by_id(mine.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.confirmation_token, None);
    assert_eq!(mailer.sent_to("naledi@example.com").len(), 2);

    // An order for a school the tailor does not serve.
    let theirs = place_order(&state, "other-cart", other, other_product).await?;
    let unassigned = payment_service::initiate_payment(
        &state,
        &admin,
        InitiatePaymentRequest {
            order_id: theirs.order_id,
            order_code: theirs.order_code.clone(),
            method: "card".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!unassigned.tailor_assigned);
    let err = tailor_service::update_order_status(
        &state,
        &tailor,
        theirs.order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::InProduction,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let order = Orders::find_by_id(theirs.order_id).one(&state.orm).await?.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    Ok(())
}

async fn admin_user(state: &AppState) -> anyhow::Result<AuthUser> {
    Ok(AuthUser {
        user_id: create_user(state, ROLE_ADMIN, "admin@example.com").await?,
        role: ROLE_ADMIN.into(),
    })
}

async fn school_with_product(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
) -> anyhow::Result<(Uuid, Uuid)> {
    let school = school_service::create_school(
        state,
        admin,
        CreateSchoolRequest {
            name: name.into(),
            address: "1 Main Road".into(),
            town: None,
            province: None,
            is_active: true,
        },
    )
    .await?
    .data
    .unwrap();
    let product = product_service::create_product(
        state,
        admin,
        CreateProductRequest {
            school_id: school.id,
            name: "Grey Trousers".into(),
            description: None,
            image_url: None,
            price: 22000,
            garment_type: None,
            available_sizes: Vec::new(),
        },
    )
    .await?
    .data
    .unwrap();
    Ok((school.id, product.id))
}

/// Register a tailor serving `schools`, verify the email and optionally approve.
async fn partner_tailor(
    state: &AppState,
    admin: &AuthUser,
    email: &str,
    schools: &[Uuid],
    approve: bool,
) -> anyhow::Result<AuthUser> {
    let registration = auth_service::register_tailor(
        state,
        TailorRegisterRequest {
            account: partner_account(email, &format!("ID-{email}")),
            business_name: None,
            schools: schools.to_vec(),
        },
    )
    .await?
    .data
    .unwrap();
    let code = TailorProfiles::find()
        .filter(TailorCol::Id.eq(registration.profile.id))
        .one(&state.orm)
        .await?
        .and_then(|p| p.email_verification_code)
        .unwrap();
    auth_service::verify_email(
        state,
        VerifyEmailRequest {
            email: email.into(),
            verification_code: code,
            user_type: UserType::Tailor,
        },
    )
    .await?;
    if approve {
        admin_service::set_tailor_approval(
            state,
            admin,
            registration.profile.id,
            ApprovalRequest { is_approved: true },
        )
        .await?;
    }
    Ok(AuthUser {
        user_id: registration.user.id,
        role: ROLE_TAILOR.into(),
    })
}

fn cart_request(product_id: Uuid, quantity: i32) -> AddCartItemRequest {
    AddCartItemRequest {
        product_id,
        quantity,
        measurements: json!({}),
        student: StudentInfo::default(),
    }
}

fn checkout_request(school_id: Uuid) -> CheckoutRequest {
    CheckoutRequest {
        school_id,
        customer_name: "Naledi Dube".into(),
        customer_phone: "0821234567".into(),
        customer_email: "naledi@example.com".into(),
        student: StudentInfo::default(),
    }
}

async fn place_order(
    state: &AppState,
    session: &str,
    school_id: Uuid,
    product_id: Uuid,
) -> anyhow::Result<CheckoutResponse> {
    let owner = CartOwner::Session(session.into());
    cart_service::add_item(state, &owner, cart_request(product_id, 1)).await?;
    Ok(checkout_service::checkout(state, &owner, checkout_request(school_id))
        .await?
        .data
        .unwrap())
}

fn partner_account(email: &str, id_number: &str) -> PartnerAccountFields {
    PartnerAccountFields {
        email: email.into(),
        password: "sew-it-right".into(),
        first_name: "Sipho".into(),
        last_name: "Nkosi".into(),
        id_number: id_number.into(),
        nationality: Some("South African".into()),
        physical_address: None,
        town: Some("Pretoria".into()),
        province: Some("Gauteng".into()),
        payment_details: None,
        phone: Some("0831112222".into()),
    }
}

async fn setup_state(
    database_url: &str,
    mailer: MemoryMailer,
    gateway: Arc<dyn PaymentGateway>,
) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE payments, shipments, order_lines, orders, cart_items, carts, \
         tailor_schools, tailor_profiles, delivery_partner_profiles, products, schools, \
         audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool: pool_from_orm(&orm),
        orm,
        config: Arc::new(test_config(database_url)),
        mailer: Arc::new(mailer),
        gateway,
    })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        first_name: Set("Site".into()),
        last_name: Set("Admin".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
