use crate::app_state::AppState;
use crate::repositories::magic_link_repository::MagicLinkRepository;
use crate::repositories::user_repository::UserRepository;
use crate::security::SecurityConfig;
use crate::services::settings_service::SettingsService;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::{ApiError, AuthError};
use reclaim_primitives::models::auth_dto::{
    AuthResponse, MagicLinkRequest, MagicLinkResponse, VerifyMagicLinkRequest,
};
use reclaim_primitives::models::entities::enum_types::UserRole;
use reclaim_primitives::models::entities::magic_link::NewMagicLink;
use reclaim_primitives::utility::mask_email;
use tracing::{error, info, warn};
use validator::Validate;

const TOKEN_LENGTH: usize = 48;
const GENERIC_RESPONSE: &str = "If the address is valid, a sign-in link has been sent";

pub struct MagicLinkService;

impl MagicLinkService {
    /// Same response whether or not the account existed beforehand.
    pub async fn request(
        state: &AppState,
        payload: MagicLinkRequest,
    ) -> Result<MagicLinkResponse, ApiError> {
        payload.validate()?;
        let payload = payload.normalize();

        let role = if state.config.is_admin_email(&payload.email) {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let raw_token = SecurityConfig::generate_token(TOKEN_LENGTH);
        let mut conn = state.db.get().map_err(|_| {
            error!("auth.magic_link: failed to acquire db connection");
            ApiError::DatabaseConnection("Database unavailable".into())
        })?;

        let (user, ttl_minutes) = conn.transaction::<_, ApiError, _>(|conn| {
            let settings = SettingsService::load(conn)?;
            let user =
                UserRepository::find_or_create(conn, &payload.email, payload.name.as_deref(), role)?;

            MagicLinkRepository::create(
                conn,
                NewMagicLink {
                    user_id: user.id,
                    token_hash: SecurityConfig::hash_secret(&raw_token),
                    expires_at: Utc::now() + Duration::minutes(settings.magic_link_ttl_minutes),
                },
            )?;

            Ok((user, settings.magic_link_ttl_minutes))
        })?;

        let link = format!(
            "{}/auth/verify?token={}",
            state.config.app_url.trim_end_matches('/'),
            raw_token
        );

        let body = format!(
            r#"
            <div style="font-family: sans-serif; max-width: 600px; margin: auto; padding: 20px;">
                <h2 style="color: #1b5e20;">Sign in to Reclaim</h2>
                <p>Use the button below to sign in. The link works once and expires in {1} minutes.</p>
                <div style="margin: 30px 0;">
                    <a href="{0}" style="background-color: #2e7d32; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px; font-weight: bold;">Sign in</a>
                </div>
                <p style="color: #666; font-size: 14px; word-break: break-all;">{0}</p>
                <p style="color: #999; font-size: 12px;">If you did not ask for this email you can ignore it.</p>
            </div>
            "#,
            link, ttl_minutes
        );

        state
            .email
            .send_email(&user.email, "Your Reclaim sign-in link", &body)
            .await?;

        info!(user_id = %user.id, email = %mask_email(&user.email), "Magic link issued");

        Ok(MagicLinkResponse {
            message: GENERIC_RESPONSE.to_string(),
        })
    }

    pub async fn verify(
        state: &AppState,
        payload: VerifyMagicLinkRequest,
    ) -> Result<AuthResponse, ApiError> {
        payload.validate()?;

        let token_hash = SecurityConfig::hash_secret(payload.token.trim());
        let now = Utc::now();
        let mut conn = state.db.get()?;

        let user = conn.transaction::<_, ApiError, _>(|conn| {
            let link = MagicLinkRepository::find_by_token_hash_for_update(conn, &token_hash)?
                .ok_or_else(|| AuthError::InvalidMagicLink("unknown token".into()))?;

            if link.used {
                warn!(link_id = %link.id, "Magic link replayed");
                return Err(AuthError::InvalidMagicLink("link already used".into()).into());
            }
            if link.expires_at <= now {
                return Err(AuthError::InvalidMagicLink("link expired".into()).into());
            }

            MagicLinkRepository::mark_used(conn, &link, now)?;

            UserRepository::find_by_id(conn, link.user_id)?
                .ok_or_else(|| ApiError::NotFound("User not found".into()))
        })?;

        let token = SecurityConfig::create_token(state, user.id, user.role).map_err(|_| {
            error!("auth.verify: jwt creation failed");
            ApiError::Internal("Authentication service unavailable".into())
        })?;

        info!(user_id = %user.id, role = %user.role, "User signed in");

        Ok(AuthResponse {
            token,
            expires_in_hours: state.config.jwt_details.jwt_expiration_hours,
            user: user.into(),
        })
    }

    /// Deletes expired and already used links.
    pub fn purge_stale(conn: &mut PgConnection) -> Result<usize, ApiError> {
        MagicLinkRepository::delete_stale(conn, Utc::now())
    }
}
