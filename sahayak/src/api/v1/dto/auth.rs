use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::TokenPair;
use crate::models::UserProfile;

/// `POST /api/v1/auth/register` request body.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// `POST /api/v1/auth/login` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/v1/auth/refresh-token` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Profile plus token pair, returned by register and login.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AuthData {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Fresh token pair, returned by refresh.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RefreshData {
    pub tokens: TokenPair,
}

/// `POST /api/v1/auth/logout` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LogoutData {
    pub success: bool,
}
