use async_trait::async_trait;

use crate::db::models::PersonProfile;
use crate::db::repos::core::people as repo;
use crate::db::DbPool;
use crate::error::AppError;

use super::ProfileStore;

/// Local SQLite store: the fallback when no hosted backend is configured.
#[derive(Clone)]
pub struct LocalProfileStore {
    pool: DbPool,
}

impl LocalProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for LocalProfileStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn list(&self) -> Result<Vec<PersonProfile>, AppError> {
        repo::get_all(&self.pool)
    }

    async fn upsert(&self, profile: &PersonProfile) -> Result<Vec<PersonProfile>, AppError> {
        repo::upsert(&self.pool, profile)?;
        tracing::debug!(profile_id = %profile.id, "Profile saved locally");
        repo::get_all(&self.pool)
    }

    async fn delete(&self, id: &str) -> Result<Vec<PersonProfile>, AppError> {
        if !repo::delete(&self.pool, id)? {
            tracing::debug!(profile_id = %id, "Delete of unknown profile ignored");
        }
        repo::get_all(&self.pool)
    }
}
