pub mod cloud;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BackendConfig;
use crate::db::models::PersonProfile;
use crate::db::DbPool;
use crate::error::AppError;

pub use cloud::CloudProfileStore;
pub use local::LocalProfileStore;

/// Persistence collaborator for whole profiles.
///
/// Every call returns the full collection as it stands after the call, so
/// callers can replace their in-memory view wholesale. Profiles are records:
/// implementations must round-trip every field exactly.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<PersonProfile>, AppError>;

    /// Insert or replace by id. New profiles appear first in the returned list.
    async fn upsert(&self, profile: &PersonProfile) -> Result<Vec<PersonProfile>, AppError>;

    async fn delete(&self, id: &str) -> Result<Vec<PersonProfile>, AppError>;
}

/// Hosted table when a backend is configured, otherwise the local database.
pub fn select_store(
    pool: DbPool,
    backend: Option<&BackendConfig>,
    timeout: std::time::Duration,
) -> Result<Arc<dyn ProfileStore>, AppError> {
    match backend {
        Some(cfg) => {
            tracing::info!(endpoint = %cfg.endpoint, "Using hosted profile table");
            Ok(Arc::new(CloudProfileStore::new(cfg.clone(), timeout)?))
        }
        None => {
            tracing::info!("No backend configured; using local profile store");
            Ok(Arc::new(LocalProfileStore::new(pool)))
        }
    }
}

/// Splice `profile` into `people` by id, inserting at the front when new.
pub(crate) fn splice(mut people: Vec<PersonProfile>, profile: &PersonProfile) -> Vec<PersonProfile> {
    match people.iter().position(|p| p.id == profile.id) {
        Some(i) => people[i] = profile.clone(),
        None => people.insert(0, profile.clone()),
    }
    people
}
