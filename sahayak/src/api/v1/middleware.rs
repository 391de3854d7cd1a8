//! # V1 Bearer Token Authentication Middleware
//!
//! Protects the account-scoped v1 routes (profile, disease logs, soil data)
//! with JWT Bearer authentication. The access token is verified against the
//! configured access secret and the referenced user is loaded from the
//! database before the request reaches the handler.
//!
//! All errors are returned as `ApiResponse<()>` JSON envelopes:
//! ```json
//! { "error": { "code": "unauthorized", "message": "..." } }
//! ```

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::auth;
use crate::models::User;

use super::response::{ApiResponse, ErrorCode};

/// The authenticated user for the current request, inserted into request
/// extensions by [`v1_auth_middleware`].
#[derive(Clone)]
pub struct AuthUser(pub User);

/// Axum middleware that enforces JWT Bearer authentication for v1 routes.
///
/// - Missing or malformed `Authorization: Bearer <token>` header → 401.
/// - Token signature/expiry invalid under the access secret → 401.
/// - Token valid but the user no longer exists → 401.
/// - Otherwise the [`AuthUser`] is attached and the request proceeds.
pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let Some(header) = auth_header else {
        return ApiResponse::<()>::error(ErrorCode::Unauthorized, "Missing authorization header")
            .into_response();
    };

    let token = match auth::bearer_token(header) {
        Ok(token) => token,
        Err(_) => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Invalid authorization header format. Expected: Bearer <token>",
            )
            .into_response();
        }
    };

    let claims = match auth::verify_access_token(&state.config.auth, token) {
        Ok(claims) => claims,
        Err(_) => {
            return ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid or expired token")
                .into_response();
        }
    };

    let user = match state.db.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return ApiResponse::<()>::error(ErrorCode::Unauthorized, "User not found")
                .into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to load user during authentication");
            return ApiResponse::<()>::from(err).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser(user));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::AppState;
    use crate::auth::issue_token_pair;
    use crate::config::{AuthConfig, Config, DatabaseConfig, ServerConfig};
    use crate::models::User;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    fn make_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: format!("file:/tmp/sahayak_mw_test_{}.db", nanoid::nanoid!()),
                auth_token: None,
                local_path: None,
            },
            auth: AuthConfig {
                access_secret: "test_access_secret".to_string(),
                refresh_secret: "test_refresh_secret".to_string(),
                access_expiration_secs: 3600,
                refresh_expiration_secs: 2_592_000,
            },
            llm: None,
            weather: None,
            twilio: None,
        }
    }

    async fn build_test_app() -> (Router, Config, std::sync::Arc<dyn crate::db::DatabaseBackend>) {
        let config = make_config();

        let raw_db = crate::db::Database::new(&config.database).await.unwrap();
        let db_backend = crate::db::LibSqlBackend::new(raw_db);
        let db: std::sync::Arc<dyn crate::db::DatabaseBackend> = std::sync::Arc::new(db_backend);

        let llm = crate::llm::LlmProvider::new(None);
        let weather = crate::weather::WeatherService::new(None);
        let state = AppState::new(config.clone(), db.clone(), llm, weather);

        async fn protected_handler() -> &'static str {
            "protected"
        }

        async fn health_handler() -> &'static str {
            "healthy"
        }

        let public_routes = Router::new().route("/health", get(health_handler));

        let protected_routes = Router::new()
            .route("/protected", get(protected_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                v1_auth_middleware,
            ));

        let app = Router::new()
            .merge(public_routes)
            .merge(protected_routes)
            .with_state(state);

        (app, config, db)
    }

    async fn parse_error_body(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_auth_rejects_missing_header() {
        let (app, _, _) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
        assert_eq!(json["error"]["message"], "Missing authorization header");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_auth_rejects_garbage_token() {
        let (app, _, _) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_auth_rejects_token_for_deleted_user() {
        let (app, config, _) = build_test_app().await;

        // Token is well formed but no such user was ever stored.
        let tokens = issue_token_pair(&config.auth, "ghost-user", "ghost@example.com").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", tokens.access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "User not found");
    }

    #[tokio::test]
    async fn test_auth_allows_valid_token() {
        let (app, config, db) = build_test_app().await;

        let user = User::new(
            "user-1".to_string(),
            "Asha Patil".to_string(),
            "asha@example.com".to_string(),
            None,
            "hash".to_string(),
        );
        db.create_user(&user).await.unwrap();

        let tokens = issue_token_pair(&config.auth, &user.id, &user.email).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", tokens.access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_rejects_refresh_token_on_protected_route() {
        let (app, config, db) = build_test_app().await;

        let user = User::new(
            "user-2".to_string(),
            "Ravi Kumar".to_string(),
            "ravi@example.com".to_string(),
            None,
            "hash".to_string(),
        );
        db.create_user(&user).await.unwrap();

        let tokens = issue_token_pair(&config.auth, &user.id, &user.email).unwrap();

        // A refresh token must not be accepted where an access token is expected.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", tokens.refresh_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_bypasses_auth() {
        let (app, _, _) = build_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
