pub mod auth;
pub mod error;
pub mod token;
pub mod validation;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new().route("/login", post(auth::login));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http());

    let router = if state.config.server.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Health check failed: database unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    Ok("OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{Config, PasswordScheme};
    use crate::db::{memory_pool, seed_demo_users, CredentialQuery, CredentialStore, UserRecord};

    async fn seeded_state(scheme: PasswordScheme) -> Arc<AppState> {
        let pool = memory_pool().await;
        seed_demo_users(&pool, scheme).await.unwrap();
        let mut config = Config::default();
        config.auth.password_scheme = scheme;
        Arc::new(AppState::new(config, pool))
    }

    async fn send(state: Arc<AppState>, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();

        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn login(state: Arc<AppState>, payload: Value) -> (StatusCode, Value) {
        let (status, bytes) = send(state, payload.to_string()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    struct FailingStore;

    #[async_trait]
    impl CredentialStore for FailingStore {
        async fn fetch_credentials(
            &self,
            _query: &CredentialQuery,
        ) -> Result<Vec<UserRecord>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn find_refugee_id(&self, _user_id: i64) -> Result<Option<i64>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    /// Credentials resolve, but the refugee profile lookup fails.
    struct BrokenRefugeeLookup;

    #[async_trait]
    impl CredentialStore for BrokenRefugeeLookup {
        async fn fetch_credentials(
            &self,
            _query: &CredentialQuery,
        ) -> Result<Vec<UserRecord>, sqlx::Error> {
            Ok(vec![UserRecord {
                id: 2,
                email: "refugiado@test.com".to_string(),
                password: "pass456".to_string(),
                full_name: "Refugiado Test".to_string(),
                role: "refugee".to_string(),
            }])
        }

        async fn find_refugee_id(&self, _user_id: i64) -> Result<Option<i64>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    #[tokio::test]
    async fn test_worker_logs_in() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, body) = login(
            state,
            json!({ "email": "trabajador@test.com", "password": "pass123" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["role"], json!("worker"));
        assert_eq!(body["name"], json!("Trabajador Test"));
        assert!(body["user_id"].is_i64());
        assert!(body["token"]
            .as_str()
            .unwrap()
            .starts_with("simulated_token_"));
        assert!(body.get("refugee_id").is_none());
    }

    #[tokio::test]
    async fn test_refugee_login_carries_refugee_id() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, body) = login(
            state,
            json!({ "email": "refugiado@test.com", "password": "pass456" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], json!("refugee"));
        assert!(body["refugee_id"].is_i64());
    }

    #[tokio::test]
    async fn test_refugee_id_lookup_can_be_disabled() {
        let pool = memory_pool().await;
        seed_demo_users(&pool, PasswordScheme::Plaintext).await.unwrap();
        let mut config = Config::default();
        config.auth.include_refugee_id = false;
        let state = Arc::new(AppState::new(config, pool));

        let (status, body) = login(
            state,
            json!({ "email": "refugiado@test.com", "password": "pass456" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("refugee_id").is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_identical() {
        let state = seeded_state(PasswordScheme::Plaintext).await;

        let (wrong_status, wrong_body) = send(
            state.clone(),
            json!({ "email": "refugiado@test.com", "password": "wrong" }).to_string(),
        )
        .await;
        let (unknown_status, unknown_body) = send(
            state,
            json!({ "email": "nadie@test.com", "password": "wrong" }).to_string(),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);

        let body: Value = serde_json::from_slice(&wrong_body).unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "message": "Email o contraseña incorrectos" })
        );
    }

    #[tokio::test]
    async fn test_password_is_case_sensitive() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, _) = login(
            state,
            json!({ "email": "trabajador@test.com", "password": "PASS123" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, body) = login(
            state,
            json!({ "email": "not-an-email", "password": "x" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Validación fallida: email inválido o password vacío"
            })
        );
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, body) = login(state, json!({ "password": "x" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_empty_password_is_rejected() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, _) = login(
            state,
            json!({ "email": "trabajador@test.com", "password": "" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_whitespace_only_password_is_rejected() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, body) = login(
            state,
            json!({ "email": "trabajador@test.com", "password": " " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, bytes) = send(state, "{ email: ").await;
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            json!("Validación fallida: email inválido o password vacío")
        );
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let (status, _) = login(state, json!(["trabajador@test.com", "pass123"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let state = Arc::new(
            AppState::new(Config::default(), memory_pool().await)
                .with_credential_store(Arc::new(FailingStore)),
        );
        let (status, body) = login(
            state,
            json!({ "email": "trabajador@test.com", "password": "pass123" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Error procesando login" })
        );
    }

    #[tokio::test]
    async fn test_refugee_lookup_failure_is_internal_error() {
        let state = Arc::new(
            AppState::new(Config::default(), memory_pool().await)
                .with_credential_store(Arc::new(BrokenRefugeeLookup)),
        );
        let (status, body) = login(
            state,
            json!({ "email": "refugiado@test.com", "password": "pass456" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Error procesando login" })
        );
    }

    #[tokio::test]
    async fn test_refugee_lookup_skipped_when_disabled() {
        let mut config = Config::default();
        config.auth.include_refugee_id = false;
        let state = Arc::new(
            AppState::new(config, memory_pool().await)
                .with_credential_store(Arc::new(BrokenRefugeeLookup)),
        );
        let (status, body) = login(
            state,
            json!({ "email": "refugiado@test.com", "password": "pass456" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], json!(2));
        assert!(body.get("refugee_id").is_none());
    }

    #[tokio::test]
    async fn test_argon2_scheme_end_to_end() {
        let state = seeded_state(PasswordScheme::Argon2).await;

        let (status, body) = login(
            state.clone(),
            json!({ "email": "trabajador@test.com", "password": "pass123" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], json!("worker"));

        let (status, _) = login(
            state,
            json!({ "email": "trabajador@test.com", "password": "pass456" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tokens_do_not_go_backwards() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let mut last = 0i64;
        for _ in 0..5 {
            let (_, body) = login(
                state.clone(),
                json!({ "email": "trabajador@test.com", "password": "pass123" }),
            )
            .await;
            let ts: i64 = body["token"]
                .as_str()
                .unwrap()
                .trim_start_matches("simulated_token_")
                .parse()
                .unwrap();
            assert!(ts >= last);
            last = ts;
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        let response = create_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_health_check_reports_closed_database() {
        let state = seeded_state(PasswordScheme::Plaintext).await;
        state.db.close().await;

        let response = create_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
