//! A user's notification inbox.

use crackmes_core::error::CoreError;
use crackmes_db::models::notification::Notification;
use crackmes_db::store::NotificationStore;

use crate::ContentService;

impl ContentService {
    /// Notifications of `recipient`, newest first.
    pub async fn notifications(&self, recipient: &str) -> Result<Vec<Notification>, CoreError> {
        let user = self.acting_user(recipient).await?;
        self.store.list_notifications(&user.name).await
    }

    pub async fn unseen_notification_count(&self, recipient: &str) -> Result<i64, CoreError> {
        let user = self.acting_user(recipient).await?;
        self.store.count_unseen_notifications(&user.name).await
    }

    /// Mark every notification of `recipient` as seen.
    pub async fn mark_notifications_seen(&self, recipient: &str) -> Result<u64, CoreError> {
        let user = self.acting_user(recipient).await?;
        self.store.mark_notifications_seen(&user.name).await
    }

    /// Delete one of the recipient's own notifications. Someone else's
    /// notification is reported as not found.
    pub async fn delete_notification(&self, recipient: &str, hexid: &str) -> Result<(), CoreError> {
        let user = self.acting_user(recipient).await?;
        if self.store.delete_notification(&user.name, hexid).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("Notification", hexid))
        }
    }
}
