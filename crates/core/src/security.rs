use crate::app_state::AppState;
use crate::repositories::merchant_repository::MerchantRepository;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use reclaim_primitives::error::{ApiError, AuthError};
use reclaim_primitives::models::entities::enum_types::UserRole;
use reclaim_primitives::models::entities::merchant::Merchant;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";
const API_KEY_PREFIX: &str = "rk_live_";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,    // expiration time
    pub iat: i64,    // issued at
    pub iss: String,
    pub aud: String,
    pub jti: String,
    pub role: UserRole,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub).map_err(|e| {
            error!("Invalid user ID in claims: {}", e);
            ApiError::Auth(AuthError::InvalidToken("Invalid user ID".to_string()))
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Merchant resolved from the `X-Api-Key` header.
#[derive(Clone, Debug)]
pub struct AuthenticatedMerchant(pub Merchant);

pub struct SecurityConfig;

impl SecurityConfig {
    pub fn create_token(state: &AppState, user_id: Uuid, role: UserRole) -> Result<String, ApiError> {
        let now = Utc::now();
        let jwt = &state.config.jwt_details;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(jwt.jwt_expiration_hours)).timestamp(),
            iss: jwt.jwt_issuer.clone(),
            aud: jwt.jwt_audience.clone(),
            jti: Uuid::new_v4().to_string(),
            role,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(jwt.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            error!("JWT encoding error: {}", e);
            ApiError::Token("Token creation failed".into())
        })
    }

    fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
        let auth_header = headers
            .get("Authorization")
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::InvalidFormat);
        }

        Ok(token.to_string())
    }

    pub fn verify_token(state: &AppState, token: &str) -> Result<Claims, AuthError> {
        let jwt = &state.config.jwt_details;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[jwt.jwt_issuer.as_str()]);
        validation.set_audience(&[jwt.jwt_audience.as_str()]);
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(jwt.jwt_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken("Invalid or expired token".into()))
    }

    /// SHA-256 hex digest used for magic-link tokens and merchant API keys.
    pub fn hash_secret(raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn generate_token(len: usize) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    pub fn generate_api_key() -> String {
        format!("{}{}", API_KEY_PREFIX, Self::generate_token(40))
    }

    pub async fn auth_middleware(
        State(state): State<Arc<AppState>>,
        mut req: Request<axum::body::Body>,
        next: Next,
    ) -> Result<Response, Response> {
        let token = Self::extract_bearer_token(req.headers())
            .map_err(|e| ApiError::from(e).into_response())?;

        let claims =
            Self::verify_token(&state, &token).map_err(|e| ApiError::from(e).into_response())?;

        req.extensions_mut().insert(claims);
        Ok(next.run(req).await)
    }

    /// Must run after `auth_middleware`.
    pub async fn admin_middleware(
        req: Request<axum::body::Body>,
        next: Next,
    ) -> Result<Response, Response> {
        let claims = req
            .extensions()
            .get::<Claims>()
            .ok_or_else(|| ApiError::from(AuthError::MissingHeader).into_response())?;

        if !claims.is_admin() {
            warn!(sub = %claims.sub, path = %req.uri().path(), "Non-admin hit admin route");
            return Err(ApiError::from(AuthError::Forbidden).into_response());
        }

        Ok(next.run(req).await)
    }

    pub async fn merchant_key_middleware(
        State(state): State<Arc<AppState>>,
        mut req: Request<axum::body::Body>,
        next: Next,
    ) -> Result<Response, Response> {
        let raw_key = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::from(AuthError::MissingHeader).into_response())?;

        let key_hash = Self::hash_secret(raw_key);

        let mut conn = state
            .db
            .get()
            .map_err(|e| ApiError::from(e).into_response())?;

        let merchant = MerchantRepository::find_active_by_api_key_hash(&mut conn, &key_hash)
            .map_err(|e| e.into_response())?
            .ok_or_else(|| ApiError::from(AuthError::InvalidApiKey).into_response())?;

        req.extensions_mut().insert(AuthenticatedMerchant(merchant));
        Ok(next.run(req).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_stable_hex() {
        let h = SecurityConfig::hash_secret("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn api_keys_are_prefixed_and_random() {
        let a = SecurityConfig::generate_api_key();
        let b = SecurityConfig::generate_api_key();
        assert!(a.starts_with(API_KEY_PREFIX));
        assert_eq!(a.len(), API_KEY_PREFIX.len() + 40);
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_bearer_headers() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            SecurityConfig::extract_bearer_token(&headers),
            Err(AuthError::MissingHeader)
        ));

        headers.insert("Authorization", "Token abc".parse().unwrap());
        assert!(matches!(
            SecurityConfig::extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat)
        ));

        headers.insert("Authorization", "Bearer abc.def".parse().unwrap());
        assert_eq!(
            SecurityConfig::extract_bearer_token(&headers).unwrap(),
            "abc.def"
        );
    }
}
