//! Best-effort notification delivery.

use std::sync::Arc;

use crackmes_db::store::NotificationStore;
use crackmes_db::EntityStore;

use crate::event::ContentEvent;

/// Writes the notifications of a [`ContentEvent`] through the Entity Store.
///
/// Runs on the caller's task. There is no retry queue: a notification that
/// fails to store is logged at `warn` and lost, and the primary action that
/// raised the event is unaffected.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn EntityStore>,
}

impl Notifier {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Deliver every notification for `event`. Returns how many were stored.
    pub async fn dispatch(&self, event: &ContentEvent) -> usize {
        let mut delivered = 0;
        for notification in event.notifications() {
            match self.store.create_notification(&notification).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        event_type = event.event_type(),
                        recipient = %notification.recipient,
                        "Failed to deliver notification"
                    );
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use crackmes_db::MemoryStore;

    use super::*;

    fn comment_event(commenter: &str) -> ContentEvent {
        ContentEvent::CommentCreated {
            crackme_name: "keygenme".into(),
            crackme_author: "alice".into(),
            commenter: commenter.into(),
        }
    }

    #[tokio::test]
    async fn delivers_to_recipient() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Notifier::new(store.clone());

        assert_eq!(notifier.dispatch(&comment_event("bob")).await, 1);

        let inbox = store.list_notifications("alice").await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].seen);
        assert!(store.list_notifications("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_comment_delivers_nothing() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Notifier::new(store.clone());

        assert_eq!(notifier.dispatch(&comment_event("alice")).await, 0);
        assert!(store.list_notifications("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let notifier = Notifier::new(store.clone());

        assert_eq!(notifier.dispatch(&comment_event("bob")).await, 0);

        store.set_unavailable(false);
        assert!(store.list_notifications("alice").await.unwrap().is_empty());
    }
}
