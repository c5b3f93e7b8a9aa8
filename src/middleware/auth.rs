use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_TAILOR: &str = "tailor";
pub const ROLE_DELIVERY: &str = "delivery";
pub const ROLE_ADMIN: &str = "admin";

/// Header carrying the anonymous cart key.
pub const CART_SESSION_HEADER: &str = "x-cart-session";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::forbidden(format!("{role} role required")));
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::bad_request("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AppError::bad_request("Invalid Authorization scheme"))
}

pub fn decode_user(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::bad_request("Invalid or expired token"))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::bad_request("Invalid user id in token"))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        decode_user(token, &state.config.jwt_secret)
    }
}

/// Who a cart belongs to: a signed-in user, a browser session key, or
/// nobody yet (a session key is minted on first use).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
    User(Uuid),
    Session(String),
    Anonymous,
}

impl FromRequestParts<AppState> for CartOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Ok(user) = bearer_token(&parts.headers)
            .and_then(|token| decode_user(token, &state.config.jwt_secret))
        {
            return Ok(CartOwner::User(user.user_id));
        }

        let session = parts
            .headers
            .get(CART_SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        Ok(match session {
            Some(key) => CartOwner::Session(key.to_string()),
            None => CartOwner::Anonymous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_for(user_id: Uuid, role: &str, secret: &str) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_valid_token() {
        let id = Uuid::new_v4();
        let user = decode_user(&token_for(id, ROLE_TAILOR, "s3cret"), "s3cret").unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, ROLE_TAILOR);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = token_for(Uuid::new_v4(), ROLE_ADMIN, "one");
        let err = decode_user(&token, "two").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn role_checks_are_forbidden_errors() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_CUSTOMER.into(),
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden(_))));
        assert!(ensure_role(&user, ROLE_CUSTOMER).is_ok());
    }
}
