//! Notification State
//!
//! Transient error/success messages shown by a banner.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Millisecond timestamp, bumped when needed to stay unique
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<Notification>,
    last_id: u64,
}

/// Append/remove list of notifications
#[derive(Debug, Default)]
pub struct NotificationState {
    inner: Mutex<Inner>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its id. Duplicates are kept.
    pub fn add_notification(&self, kind: NotificationType, message: impl Into<String>) -> u64 {
        let mut inner = self.lock();

        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let id = now.max(inner.last_id + 1);
        inner.last_id = id;

        let message = message.into();
        debug!("Notification {} ({:?}): {}", id, kind, message);
        inner.items.push(Notification { id, kind, message });
        id
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.add_notification(NotificationType::Error, message)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.add_notification(NotificationType::Success, message)
    }

    pub fn remove_notification(&self, id: u64) {
        self.lock().items.retain(|n| n.id != id);
    }

    pub fn clear_notifications(&self) {
        self.lock().items.clear();
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent error; banners show only this one
    pub fn latest_error(&self) -> Option<Notification> {
        self.lock()
            .items
            .iter()
            .rev()
            .find(|n| n.kind == NotificationType::Error)
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let state = NotificationState::new();
        let a = state.error("boom");
        let b = state.error("boom");
        let c = state.success("ok");
        assert!(a < b && b < c);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn remove_drops_exactly_one() {
        let state = NotificationState::new();
        state.error("first");
        let id = state.error("second");
        state.success("third");

        state.remove_notification(id);
        assert_eq!(state.len(), 2);
        assert!(state.all().iter().all(|n| n.id != id));

        state.remove_notification(id);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn latest_error_wins() {
        let state = NotificationState::new();
        assert!(state.latest_error().is_none());

        state.error("old");
        state.error("new");
        state.success("saved");

        assert_eq!(state.latest_error().unwrap().message, "new");
    }

    #[test]
    fn clear_empties_list() {
        let state = NotificationState::new();
        state.error("x");
        state.clear_notifications();
        assert!(state.is_empty());
    }

    #[test]
    fn serializes_type_field() {
        let n = Notification {
            id: 1,
            kind: NotificationType::Error,
            message: "m".into(),
        };
        let v = serde_json::to_value(&n).unwrap();
        assert_eq!(v["type"], "error");
    }
}
