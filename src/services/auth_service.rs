use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    codes,
    config::AppConfig,
    dto::auth::{
        Claims, DeliveryRegisterRequest, DeliveryRegistration, LoginRequest, LoginResponse,
        MessageResponse, PartnerAccountFields, RegisterRequest, ResendVerificationRequest,
        TailorRegisterRequest, TailorRegistration, UserType, VerifyEmailRequest,
    },
    entity::{
        delivery_partner_profiles::{
            ActiveModel as DeliveryActive, Column as DeliveryCol, Entity as DeliveryProfiles,
        },
        schools::{Column as SchoolCol, Entity as Schools},
        tailor_profiles::{ActiveModel as TailorActive, Column as TailorCol, Entity as TailorProfiles},
        tailor_schools::{ActiveModel as TailorSchoolActive, Entity as TailorSchools},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_CUSTOMER, ROLE_DELIVERY, ROLE_TAILOR},
    models::{DeliveryPartnerProfile, TailorProfile, User},
    notifications::{self, AccountKind},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_TAILOR_SCHOOLS: usize = 3;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("A valid email is required"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn issue_token(config: &AppConfig, user: &UserModel) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(format!("Bearer {}", token))
}

async fn ensure_email_free(state: &AppState, email: &str) -> AppResult<()> {
    let taken = Users::find()
        .filter(UserCol::Email.eq(email))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::bad_request("Email is already taken"));
    }
    Ok(())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = normalize_email(&payload.email);
    validate_credentials(&email, &payload.password)?;
    ensure_email_free(state, &email).await?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        first_name: Set(payload.first_name.unwrap_or_default()),
        last_name: Set(payload.last_name.unwrap_or_default()),
        role: Set(ROLE_CUSTOMER.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let token = issue_token(&state.config, &user)?;

    audit::record(
        state,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        LoginResponse {
            token,
            user: user.into(),
        },
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = normalize_email(&payload.email);
    let user = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::bad_request("Invalid email or password")),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::bad_request("Invalid email or password"));
    }

    let token = issue_token(&state.config, &user)?;

    audit::record(
        state,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(ApiResponse::success("Profile", model.into(), None))
}

/// Shared checks for partner sign-up, returning the normalized email.
async fn check_partner_account(
    state: &AppState,
    account: &PartnerAccountFields,
) -> AppResult<String> {
    let email = normalize_email(&account.email);
    validate_credentials(&email, &account.password)?;
    if account.first_name.trim().is_empty() || account.last_name.trim().is_empty() {
        return Err(AppError::bad_request("First and last name are required"));
    }
    if account.id_number.trim().is_empty() {
        return Err(AppError::bad_request("ID number is required"));
    }
    ensure_email_free(state, &email).await?;
    Ok(email)
}

fn partner_user(email: String, account: &PartnerAccountFields, role: &str) -> AppResult<UserActive> {
    Ok(UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(hash_password(&account.password)?),
        first_name: Set(account.first_name.trim().to_string()),
        last_name: Set(account.last_name.trim().to_string()),
        role: Set(role.into()),
        created_at: NotSet,
    })
}

fn full_name(user: &UserModel) -> String {
    format!("{} {}", user.first_name, user.last_name)
        .trim()
        .to_string()
}

pub async fn register_tailor(
    state: &AppState,
    payload: TailorRegisterRequest,
) -> AppResult<ApiResponse<TailorRegistration>> {
    let TailorRegisterRequest {
        account,
        business_name,
        mut schools,
    } = payload;

    schools.sort();
    schools.dedup();
    if schools.len() < MIN_TAILOR_SCHOOLS {
        return Err(AppError::bad_request(format!(
            "You must select at least {MIN_TAILOR_SCHOOLS} schools."
        )));
    }
    let known = Schools::find()
        .filter(SchoolCol::Id.is_in(schools.clone()))
        .count(&state.orm)
        .await?;
    if known as usize != schools.len() {
        return Err(AppError::bad_request("One or more schools do not exist"));
    }

    let email = check_partner_account(state, &account).await?;
    let id_number = account.id_number.trim().to_string();
    let duplicate = TailorProfiles::find()
        .filter(TailorCol::IdNumber.eq(id_number.as_str()))
        .count(&state.orm)
        .await?;
    if duplicate > 0 {
        return Err(AppError::bad_request("ID number is already registered"));
    }

    let code = codes::verification_code();
    let txn = state.orm.begin().await?;

    let user = partner_user(email, &account, ROLE_TAILOR)?.insert(&txn).await?;
    let profile = TailorActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        is_approved: Set(false),
        id_number: Set(id_number),
        nationality: Set(account.nationality),
        physical_address: Set(account.physical_address),
        town: Set(account.town),
        province: Set(account.province),
        payment_details: Set(account.payment_details),
        phone: Set(account.phone),
        business_name: Set(business_name),
        email_verification_code: Set(Some(code.clone())),
        is_email_verified: Set(false),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    TailorSchools::insert_many(schools.iter().map(|school_id| TailorSchoolActive {
        tailor_profile_id: Set(profile.id),
        school_id: Set(*school_id),
    }))
    .exec(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(user_id = %user.id, schools = schools.len(), "tailor registered");

    let email = notifications::verification_code(
        &state.config,
        AccountKind::Tailor,
        &user.email,
        &full_name(&user),
        &code,
    );
    state.mailer.send(&email).await?;

    audit::record(
        state,
        Some(user.id),
        "tailor_register",
        "tailor_profiles",
        serde_json::json!({ "profile_id": profile.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Tailor registered",
        TailorRegistration {
            message: "Registration successful. Please check your email for the verification code."
                .into(),
            profile: TailorProfile::from_entity(profile, schools),
            user: user.into(),
        },
        None,
    ))
}

pub async fn register_delivery_partner(
    state: &AppState,
    payload: DeliveryRegisterRequest,
) -> AppResult<ApiResponse<DeliveryRegistration>> {
    let DeliveryRegisterRequest {
        account,
        vehicle_type,
        license_plate,
    } = payload;

    let email = check_partner_account(state, &account).await?;
    let id_number = account.id_number.trim().to_string();
    let duplicate = DeliveryProfiles::find()
        .filter(DeliveryCol::IdNumber.eq(id_number.as_str()))
        .count(&state.orm)
        .await?;
    if duplicate > 0 {
        return Err(AppError::bad_request("ID number is already registered"));
    }

    let code = codes::verification_code();
    let txn = state.orm.begin().await?;

    let user = partner_user(email, &account, ROLE_DELIVERY)?
        .insert(&txn)
        .await?;
    let profile = DeliveryActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        is_approved: Set(false),
        id_number: Set(id_number),
        nationality: Set(account.nationality),
        physical_address: Set(account.physical_address),
        town: Set(account.town),
        province: Set(account.province),
        payment_details: Set(account.payment_details),
        phone: Set(account.phone),
        vehicle_type: Set(vehicle_type),
        license_plate: Set(license_plate),
        email_verification_code: Set(Some(code.clone())),
        is_email_verified: Set(false),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(user_id = %user.id, "delivery partner registered");

    let email = notifications::verification_code(
        &state.config,
        AccountKind::DeliveryPartner,
        &user.email,
        &full_name(&user),
        &code,
    );
    state.mailer.send(&email).await?;

    audit::record(
        state,
        Some(user.id),
        "delivery_register",
        "delivery_partner_profiles",
        serde_json::json!({ "profile_id": profile.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Delivery partner registered",
        DeliveryRegistration {
            message: "Registration successful. Please check your email for the verification code."
                .into(),
            profile: DeliveryPartnerProfile::from(profile),
            user: user.into(),
        },
        None,
    ))
}

/// Verification state of a partner profile: (stored code, verified).
async fn verification_state(
    state: &AppState,
    user_type: UserType,
    user_id: Uuid,
) -> AppResult<(Option<String>, bool)> {
    match user_type {
        UserType::Tailor => TailorProfiles::find()
            .filter(TailorCol::UserId.eq(user_id))
            .one(&state.orm)
            .await?
            .map(|p| (p.email_verification_code, p.is_email_verified))
            .ok_or(AppError::NotFound("Tailor profile")),
        UserType::Delivery => DeliveryProfiles::find()
            .filter(DeliveryCol::UserId.eq(user_id))
            .one(&state.orm)
            .await?
            .map(|p| (p.email_verification_code, p.is_email_verified))
            .ok_or(AppError::NotFound("Delivery partner profile")),
    }
}

async fn store_verification(
    state: &AppState,
    user_type: UserType,
    user_id: Uuid,
    code: Option<String>,
    verified: bool,
) -> AppResult<()> {
    match user_type {
        UserType::Tailor => {
            TailorProfiles::update_many()
                .col_expr(TailorCol::EmailVerificationCode, Expr::value(code))
                .col_expr(TailorCol::IsEmailVerified, Expr::value(verified))
                .filter(TailorCol::UserId.eq(user_id))
                .exec(&state.orm)
                .await?;
        }
        UserType::Delivery => {
            DeliveryProfiles::update_many()
                .col_expr(DeliveryCol::EmailVerificationCode, Expr::value(code))
                .col_expr(DeliveryCol::IsEmailVerified, Expr::value(verified))
                .filter(DeliveryCol::UserId.eq(user_id))
                .exec(&state.orm)
                .await?;
        }
    }
    Ok(())
}

async fn find_user_by_email(state: &AppState, email: &str) -> AppResult<UserModel> {
    Users::find()
        .filter(UserCol::Email.eq(normalize_email(email)))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))
}

pub async fn verify_email(
    state: &AppState,
    payload: VerifyEmailRequest,
) -> AppResult<ApiResponse<MessageResponse>> {
    let user = find_user_by_email(state, &payload.email).await?;
    let (code, verified) = verification_state(state, payload.user_type, user.id).await?;

    if verified {
        return Err(AppError::bad_request("Email already verified"));
    }
    if code.as_deref() != Some(payload.verification_code.trim()) {
        return Err(AppError::bad_request("Invalid verification code"));
    }

    store_verification(state, payload.user_type, user.id, None, true).await?;
    tracing::info!(user_id = %user.id, "email verified");

    audit::record(
        state,
        Some(user.id),
        "email_verified",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Email verified",
        MessageResponse {
            message: "Email verified successfully.".into(),
        },
        None,
    ))
}

pub async fn resend_verification(
    state: &AppState,
    payload: ResendVerificationRequest,
) -> AppResult<ApiResponse<MessageResponse>> {
    let user = find_user_by_email(state, &payload.email).await?;
    let (_, verified) = verification_state(state, payload.user_type, user.id).await?;
    if verified {
        return Err(AppError::bad_request("Email already verified"));
    }

    let code = codes::verification_code();
    store_verification(state, payload.user_type, user.id, Some(code.clone()), false).await?;

    let kind = match payload.user_type {
        UserType::Tailor => AccountKind::Tailor,
        UserType::Delivery => AccountKind::DeliveryPartner,
    };
    let email =
        notifications::resent_verification_code(&state.config, kind, &user.email, &full_name(&user), &code);
    state.mailer.send(&email).await?;

    Ok(ApiResponse::success(
        "Verification code sent",
        MessageResponse {
            message: "A new verification code has been sent to your email.".into(),
        },
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_need_address_and_length() {
        assert!(validate_credentials("parent@example.com", "longenough").is_ok());
        assert!(validate_credentials("parent.example.com", "longenough").is_err());
        assert!(validate_credentials("parent@example.com", "short").is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Parent@Example.COM "), "parent@example.com");
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"correct horse", &parsed)
            .is_ok());
    }
}
