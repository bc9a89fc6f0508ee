use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::LoginError;
use super::token::TokenIssuer;
use super::validation::{build_credential_query, parse_login_request};
use crate::config::PasswordScheme;
use crate::crypto::verify_password;
use crate::db::{LoginSuccess, UserRecord, ROLE_REFUGEE};
use crate::AppState;

/// Check the looked-up rows against the submitted password.
///
/// Only the first row is considered. No row and a wrong password produce the
/// same error.
pub fn verify_credentials(
    rows: &[UserRecord],
    submitted_password: &str,
    scheme: PasswordScheme,
    tokens: &TokenIssuer,
) -> Result<LoginSuccess, LoginError> {
    let user = rows.first().ok_or(LoginError::InvalidCredentials)?;

    if !verify_password(scheme, submitted_password, &user.password)? {
        return Err(LoginError::InvalidCredentials);
    }

    Ok(LoginSuccess::for_user(user, tokens.issue()))
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LoginSuccess>, LoginError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!("Login body rejected: {}", rejection.body_text());
            return Err(LoginError::Validation);
        }
    };

    let request = parse_login_request(&payload).ok_or_else(|| {
        debug!("Login payload failed validation");
        LoginError::Validation
    })?;

    let query = build_credential_query(&request);
    let rows = state.credentials.fetch_credentials(&query).await?;

    let success = verify_credentials(
        &rows,
        &request.password,
        state.config.auth.password_scheme,
        &state.tokens,
    )
    .map_err(|e| {
        if matches!(e, LoginError::InvalidCredentials) {
            info!(email = %request.email, "Login rejected: invalid credentials");
        }
        e
    })?;

    let success = if state.config.auth.include_refugee_id && success.role == ROLE_REFUGEE {
        let refugee_id = state.credentials.find_refugee_id(success.user_id).await?;
        success.with_refugee_id(refugee_id)
    } else {
        success
    };

    info!(
        user_id = success.user_id,
        role = %success.role,
        refugee_id = ?success.refugee_id,
        "User logged in"
    );

    Ok(Json(success))
}
