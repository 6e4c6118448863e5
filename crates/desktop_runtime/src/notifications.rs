//! Notification queue fed by `windowSendNotification` events.
//!
//! Notifications are only ever removed by [`NotificationQueue::dismiss`]; recency predicates
//! decide what the toast panel shows, never what the queue keeps.

use std::sync::atomic::{AtomicU64, Ordering};

use desktop_app_contract::NotificationDraft;
use platform_host::{elapsed_ms, unix_time_ms_now};
use serde::{Deserialize, Serialize};

use crate::model::{DesktopPreferences, DEFAULT_NOTIFICATION_DISPLAY_MS};

static NEXT_NOTIFICATION_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Process-wide unique notification id; strictly increasing in creation order.
pub struct NotificationId(pub u64);

impl NotificationId {
    fn next() -> Self {
        Self(NEXT_NOTIFICATION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Posted notification.
pub struct Notification {
    /// Queue id.
    pub id: NotificationId,
    /// Wall-clock creation time in unix milliseconds.
    pub created_at_ms: u64,
    /// Payload as posted by the app.
    #[serde(flatten)]
    pub draft: NotificationDraft,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Ordered notification list, oldest first.
pub struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `draft` stamped with a fresh id and the current time.
    pub fn add_notification(&mut self, draft: NotificationDraft) -> &Notification {
        self.add_notification_at(draft, unix_time_ms_now())
    }

    /// Appends `draft` stamped with a fresh id and `created_at_ms`.
    pub fn add_notification_at(
        &mut self,
        draft: NotificationDraft,
        created_at_ms: u64,
    ) -> &Notification {
        let notification = Notification {
            id: NotificationId::next(),
            created_at_ms,
            draft,
        };
        tracing::debug!(
            id = notification.id.0,
            app = %notification.draft.app,
            "notification posted"
        );
        self.items.push(notification);
        &self.items[self.items.len() - 1]
    }

    /// Removes the notification `id`; returns `false` when it was not queued.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Most recently posted notification.
    pub fn latest_notification(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Looks up a notification by id.
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Iterates notifications oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Notifications the toast panel should show at `now_ms`.
    pub fn displayed(&self, now_ms: u64, preferences: &DesktopPreferences) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|item| {
                preferences.keep_notifications_displayed
                    || elapsed_ms(item.created_at_ms, now_ms) < preferences.notification_display_ms
            })
            .collect()
    }
}

/// Returns `true` while `notification` is less than five seconds old.
pub fn just_displayed(notification: &Notification) -> bool {
    just_displayed_at(notification, unix_time_ms_now())
}

/// [`just_displayed`] evaluated at `now_ms`.
pub fn just_displayed_at(notification: &Notification, now_ms: u64) -> bool {
    elapsed_ms(notification.created_at_ms, now_ms) < DEFAULT_NOTIFICATION_DISPLAY_MS
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn draft(header: &str) -> NotificationDraft {
        NotificationDraft::new("finance", header, "body")
    }

    #[test]
    fn ids_keep_increasing_across_dismissals() {
        let mut queue = NotificationQueue::new();
        let first = queue.add_notification(draft("a")).id;
        let second = queue.add_notification(draft("b")).id;
        assert!(queue.dismiss(first));
        assert!(queue.dismiss(second));
        let third = queue.add_notification(draft("c")).id;

        assert!(first < second);
        assert!(second < third);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn dismissing_unknown_id_changes_nothing() {
        let mut queue = NotificationQueue::new();
        queue.add_notification(draft("a"));
        queue.add_notification(draft("b"));
        let before = queue.clone();

        assert!(!queue.dismiss(NotificationId(u64::MAX)));
        assert_eq!(queue, before);
    }

    #[test]
    fn latest_is_last_posted() {
        let mut queue = NotificationQueue::new();
        assert!(queue.latest_notification().is_none());
        let id = queue.add_notification(draft("a")).id;
        queue.add_notification(draft("b"));

        assert_eq!(
            queue.latest_notification().map(|n| n.draft.header.as_str()),
            Some("b")
        );
        assert_eq!(queue.get(id).map(|n| n.draft.header.as_str()), Some("a"));
    }

    #[test]
    fn recency_window_is_five_seconds() {
        let mut queue = NotificationQueue::new();
        let notification = queue.add_notification_at(draft("a"), 10_000).clone();

        assert!(just_displayed_at(&notification, 10_000));
        assert!(just_displayed_at(&notification, 14_999));
        assert!(!just_displayed_at(&notification, 15_000));
        assert!(just_displayed_at(&notification, 9_000));
    }

    #[test]
    fn displayed_honours_keep_switch() {
        let mut queue = NotificationQueue::new();
        queue.add_notification_at(draft("old"), 0);
        queue.add_notification_at(draft("new"), 60_000);

        let mut prefs = DesktopPreferences::default();
        let shown: Vec<_> = queue
            .displayed(61_000, &prefs)
            .into_iter()
            .map(|n| n.draft.header.as_str())
            .collect();
        assert_eq!(shown, vec!["new"]);

        prefs.keep_notifications_displayed = true;
        assert_eq!(queue.displayed(61_000, &prefs).len(), 2);
    }

    #[test]
    fn notification_serializes_flat() {
        let mut queue = NotificationQueue::new();
        let notification = queue.add_notification_at(draft("a"), 5);
        let value = serde_json::to_value(notification).expect("serialize");
        assert_eq!(value["createdAtMs"], 5);
        assert_eq!(value["header"], "a");
        assert_eq!(value["app"], "finance");
    }
}
