//! Login request and response contract.

use serde::{Deserialize, Serialize};

use super::UserRecord;

/// The lookup executed for every accepted login.
pub const CREDENTIAL_LOOKUP_SQL: &str =
    "SELECT id, email, password, full_name, role FROM users WHERE email = $1";

/// A payload that passed validation. Fields are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A parameterized statement handed to the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialQuery {
    pub sql: &'static str,
    pub params: Vec<String>,
}

impl CredentialQuery {
    pub fn for_email(email: &str) -> Self {
        Self {
            sql: CREDENTIAL_LOOKUP_SQL,
            params: vec![email.to_string()],
        }
    }
}

/// Body of a 200 login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub success: bool,
    pub user_id: i64,
    pub name: String,
    pub role: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refugee_id: Option<i64>,
}

impl LoginSuccess {
    pub fn for_user(user: &UserRecord, token: String) -> Self {
        Self {
            success: true,
            user_id: user.id,
            name: user.full_name.clone(),
            role: user.role.clone(),
            token,
            refugee_id: None,
        }
    }

    pub fn with_refugee_id(mut self, refugee_id: Option<i64>) -> Self {
        self.refugee_id = refugee_id;
        self
    }
}

/// Body of every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
}

impl FailureBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
