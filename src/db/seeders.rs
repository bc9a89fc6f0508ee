//! Database seeders for demo data
//!
//! Inserts the worker and refugee accounts used by the mobile client during
//! development. Existing accounts are left untouched.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::{NewUser, ROLE_REFUGEE, ROLE_WORKER};
use crate::config::PasswordScheme;
use crate::crypto::encode_for_storage;

const DEMO_USERS: &[NewUser<'static>] = &[
    NewUser {
        email: "trabajador@test.com",
        password: "pass123",
        full_name: "Trabajador Test",
        role: ROLE_WORKER,
    },
    NewUser {
        email: "refugiado@test.com",
        password: "pass456",
        full_name: "Refugiado Test",
        role: ROLE_REFUGEE,
    },
];

/// Seed the demo accounts (and a refugee profile for refugee accounts)
pub async fn seed_demo_users(pool: &SqlitePool, scheme: PasswordScheme) -> Result<()> {
    info!("Seeding demo users...");

    let mut inserted = 0;
    for user in DEMO_USERS {
        let stored = encode_for_storage(scheme, user.password)
            .with_context(|| format!("Failed to prepare password for {}", user.email))?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (email, password, full_name, role) VALUES (?, ?, ?, ?)",
        )
        .bind(user.email)
        .bind(&stored)
        .bind(user.full_name)
        .bind(user.role)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();

        if user.role == ROLE_REFUGEE {
            sqlx::query(
                r#"INSERT INTO refugee (user_id, name)
                   SELECT u.id, u.full_name FROM users u
                   WHERE u.email = ?
                     AND NOT EXISTS (SELECT 1 FROM refugee r WHERE r.user_id = u.id)"#,
            )
            .bind(user.email)
            .execute(pool)
            .await?;
        }
    }

    info!(inserted, "Demo users seeded");
    Ok(())
}
