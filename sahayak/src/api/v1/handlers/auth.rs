//! v1 account handlers: register, login, token refresh, profile, logout.

use axum::extract::State;
use axum::Extension;
use nanoid::nanoid;
use validator::Validate;

use crate::api::v1::dto::{
    AuthData, LoginRequest, LogoutData, RefreshData, RefreshTokenRequest, RegisterRequest,
};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::{AppJson, AppState};
use crate::auth;
use crate::models::{User, UserProfile};

/// `POST /api/v1/auth/register`
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthData),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResponse<AuthData> {
    if let Err(errors) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, flatten_validation_errors(&errors));
    }

    match state.db.get_user_by_email(&req.email).await {
        Ok(Some(_)) => {
            return ApiResponse::error(ErrorCode::Conflict, "User with this email already exists");
        }
        Ok(None) => {}
        Err(err) => return ApiResponse::from(err),
    }

    let password_hash = match auth::hash_password(&req.password) {
        Ok(hash) => hash,
        Err(err) => return ApiResponse::from(err),
    };

    let user = User::new(
        nanoid!(),
        req.full_name.trim().to_string(),
        req.email,
        req.phone,
        password_hash,
    );

    if let Err(err) = state.db.create_user(&user).await {
        return ApiResponse::from(err);
    }

    let tokens = match auth::issue_token_pair(&state.config.auth, &user.id, &user.email) {
        Ok(tokens) => tokens,
        Err(err) => return ApiResponse::from(err),
    };

    tracing::info!(user_id = %user.id, "Registered new user");

    ApiResponse::created(AuthData {
        user: UserProfile::from(user),
        tokens,
    })
}

/// `POST /api/v1/auth/login`
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthData),
        (status = 401, description = "Invalid credentials", body = ApiError),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResponse<AuthData> {
    // The same message covers both unknown email and wrong password, so the
    // endpoint cannot be used to probe which addresses have accounts.
    let mut user = match state.db.get_user_by_email(&req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return ApiResponse::error(ErrorCode::Unauthorized, "Invalid email or password");
        }
        Err(err) => return ApiResponse::from(err),
    };

    match auth::verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return ApiResponse::error(ErrorCode::Unauthorized, "Invalid email or password");
        }
        Err(err) => return ApiResponse::from(err),
    }

    let now = chrono::Utc::now();
    if let Err(err) = state.db.update_last_login(&user.id, now).await {
        return ApiResponse::from(err);
    }
    user.last_login_at = Some(now);

    let tokens = match auth::issue_token_pair(&state.config.auth, &user.id, &user.email) {
        Ok(tokens) => tokens,
        Err(err) => return ApiResponse::from(err),
    };

    ApiResponse::success(AuthData {
        user: UserProfile::from(user),
        tokens,
    })
}

/// `POST /api/v1/auth/refresh-token`
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Fresh token pair", body = RefreshData),
        (status = 401, description = "Invalid or expired refresh token", body = ApiError),
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshTokenRequest>,
) -> ApiResponse<RefreshData> {
    let claims = match auth::verify_refresh_token(&state.config.auth, &req.refresh_token) {
        Ok(claims) => claims,
        Err(_) => {
            return ApiResponse::error(
                ErrorCode::Unauthorized,
                "Invalid or expired refresh token",
            );
        }
    };

    let user = match state.db.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return ApiResponse::error(ErrorCode::Unauthorized, "User not found"),
        Err(err) => return ApiResponse::from(err),
    };

    let tokens = match auth::issue_token_pair(&state.config.auth, &user.id, &user.email) {
        Ok(tokens) => tokens,
        Err(err) => return ApiResponse::from(err),
    };

    ApiResponse::success(RefreshData { tokens })
}

/// `GET /api/v1/auth/me`
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Authentication required", body = ApiError),
    )
)]
pub async fn me(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResponse<UserProfile> {
    ApiResponse::success(UserProfile::from(user))
}

/// `POST /api/v1/auth/logout`
///
/// Token-based auth keeps no server-side session; the client discards its
/// tokens.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = LogoutData),
    )
)]
pub async fn logout() -> ApiResponse<LogoutData> {
    ApiResponse::success(LogoutData { success: true })
}

fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => parts.push(message.to_string()),
                None => parts.push(format!("Invalid value for {field}")),
            }
        }
    }
    if parts.is_empty() {
        "Validation error".to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_reports_each_message() {
        let req = RegisterRequest {
            full_name: "a".to_string(),
            email: "bad".to_string(),
            phone: None,
            password: "short".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let message = flatten_validation_errors(&errors);
        assert!(message.contains("Full name"));
        assert!(message.contains("email"));
        assert!(message.contains("Password"));
    }
}
