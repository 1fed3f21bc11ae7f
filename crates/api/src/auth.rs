//! Bearer-token authentication for the admin API.
//!
//! Tokens are HS256 JWTs issued by the site's auth provider. The subject must
//! also appear as an active row in the admin store.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Auth provider user id.
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// An authenticated caller that is an active admin. Use as a handler argument
/// to guard a route.
#[derive(Debug, Clone)]
pub struct AdminCaller {
    pub uid: String,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let claims = verify_token(&state.config().jwt_secret, bearer.token()).map_err(|e| {
            tracing::debug!("rejected bearer token: {e}");
            ApiError::Unauthorized
        })?;

        match state.admins().find_admin(&claims.sub).await? {
            Some(admin) if admin.active => Ok(AdminCaller {
                uid: admin.uid,
                email: admin.email.or(claims.email),
            }),
            _ => {
                tracing::warn!(uid = %claims.sub, "admin access denied");
                Err(ApiError::Forbidden("not an active admin".to_string()))
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn issue_token(secret: &str, uid: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: uid.to_string(),
        exp: (chrono::Utc::now().timestamp() + ttl_secs) as usize,
        email: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encodes")
}
