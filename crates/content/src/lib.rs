//! Content lifecycle orchestration.
//!
//! [`ContentService`] ties the Entity Store, the visibility state machine,
//! counter maintenance, ratings, notification fan-out and artifact storage
//! together.
//! Each operation runs on the caller's task:
//!
//! ```text
//! submit ──> validate ──> store insert ──> artifact write ──> counters ──> notify
//!                                            (orphan logged)     (repairable)  (best effort)
//! ```

use std::sync::Arc;

use crackmes_core::error::CoreError;
use crackmes_core::storage::StorageConfig;
use crackmes_core::validation::validate_user_name;
use crackmes_db::models::user::User;
use crackmes_db::store::UserStore;
use crackmes_db::EntityStore;
use crackmes_events::Notifier;

pub mod artifact;
pub mod counters;
pub mod inbox;
pub mod moderation;
pub mod ratings;
pub mod submissions;
pub mod upload;
pub mod views;

pub use counters::{Reconciled, ReconcileReport, RepairMode};
pub use moderation::Moderated;
pub use ratings::Rated;
pub use submissions::NewCrackme;
pub use upload::Upload;
pub use views::{CrackmeDetail, SiteStats, UserProfile};

/// Entry point for every content operation.
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn EntityStore>,
    storage: Arc<StorageConfig>,
    notifier: Notifier,
}

impl ContentService {
    pub fn new(store: Arc<dyn EntityStore>, storage: Arc<StorageConfig>) -> Self {
        let notifier = Notifier::new(Arc::clone(&store));
        Self {
            store,
            storage,
            notifier,
        }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Resolve the identity supplied by the authentication source to a
    /// stored user. The match is exact and case-sensitive.
    pub async fn acting_user(&self, name: &str) -> Result<User, CoreError> {
        validate_user_name(name).map_err(|_| CoreError::Unauthorized("Unknown user".into()))?;
        match self.store.find_user_by_name(name).await {
            Ok(user) => Ok(user),
            Err(CoreError::NotFound { .. }) => Err(CoreError::Unauthorized("Unknown user".into())),
            Err(e) => Err(e),
        }
    }
}
