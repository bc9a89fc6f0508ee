//! Credential lookups used by the login endpoint.

use async_trait::async_trait;

use super::{CredentialQuery, DbPool, UserRecord};

const REFUGEE_ID_SQL: &str = "SELECT id AS refugee_id FROM refugee WHERE user_id = $1 LIMIT 1";

/// Read-only access to user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Run a credential query exactly as built and return every matching row.
    async fn fetch_credentials(
        &self,
        query: &CredentialQuery,
    ) -> Result<Vec<UserRecord>, sqlx::Error>;

    /// Refugee profile linked to a user, if any.
    async fn find_refugee_id(&self, user_id: i64) -> Result<Option<i64>, sqlx::Error>;
}

pub struct SqlCredentialStore {
    pool: DbPool,
}

impl SqlCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn fetch_credentials(
        &self,
        query: &CredentialQuery,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        let mut statement = sqlx::query_as::<_, UserRecord>(query.sql);
        for param in &query.params {
            statement = statement.bind(param);
        }
        statement.fetch_all(&self.pool).await
    }

    async fn find_refugee_id(&self, user_id: i64) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(REFUGEE_ID_SQL)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }
}
