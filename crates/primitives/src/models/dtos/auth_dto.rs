use crate::models::dtos::user_dto::UserSummaryDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MagicLinkRequest {
    #[schema(example = "user@example.com")]
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
}

impl MagicLinkRequest {
    pub fn normalize(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self.name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"message": "If the address is valid, a sign-in link has been sent"}))]
pub struct MagicLinkResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct VerifyMagicLinkRequest {
    #[validate(length(min = 16, max = 256))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub expires_in_hours: i64,
    pub user: UserSummaryDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}
