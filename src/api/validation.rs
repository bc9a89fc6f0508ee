//! Input validation for login requests.
//!
//! The check is deliberately coarse: it answers yes or no and never says
//! which field was wrong.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::db::{CredentialQuery, LoginRequest};

/// Whitespace as browsers and Node define it for `\s` (includes BOM, excludes NEL)
const CLIENT_WHITESPACE: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

lazy_static! {
    /// local@domain.tld, no whitespace and no extra "@" in any part
    static ref EMAIL_REGEX: Regex = Regex::new(&format!(
        r"^[^{ws}@]+@[^{ws}@]+\.[^{ws}@]+$",
        ws = CLIENT_WHITESPACE
    ))
    .unwrap();
}

/// Validate an email address shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Decide whether an arbitrary JSON value is a well-formed login request.
///
/// A password made only of whitespace counts as empty.
pub fn validate_login_payload(payload: &Value) -> bool {
    let Some(object) = payload.as_object() else {
        return false;
    };

    if !object.contains_key("email") || !object.contains_key("password") {
        return false;
    }

    let email_ok = object
        .get("email")
        .and_then(Value::as_str)
        .is_some_and(is_valid_email);
    let password_ok = object
        .get("password")
        .and_then(Value::as_str)
        .is_some_and(|p| !p.trim().is_empty());

    email_ok && password_ok
}

/// Validate a payload and extract its fields verbatim
pub fn parse_login_request(payload: &Value) -> Option<LoginRequest> {
    if !validate_login_payload(payload) {
        return None;
    }

    // Both fields were checked to be strings above.
    let email = payload.get("email")?.as_str()?.to_string();
    let password = payload.get("password")?.as_str()?.to_string();
    Some(LoginRequest { email, password })
}

/// Turn a validated request into the credential lookup
pub fn build_credential_query(request: &LoginRequest) -> CredentialQuery {
    CredentialQuery::for_email(&request.email)
}
