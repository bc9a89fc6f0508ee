//! User account models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const ROLE_WORKER: &str = "worker";
pub const ROLE_REFUGEE: &str = "refugee";

/// A row of the `users` table as read by the login query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    /// Stored credential: the password itself, or a PHC string under the argon2 scheme
    pub password: String,
    pub full_name: String,
    pub role: String,
}

/// Account to insert when seeding.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
}
