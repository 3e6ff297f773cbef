//! Transient user notifications.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

/// Queue of notifications waiting to be shown.
#[derive(Debug, Default)]
pub struct NotificationBus {
    notifications: Vec<Notification>,
    next_id: u64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notification and returns its id. Ids are never reused.
    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        self.next_id += 1;
        self.notifications.push(Notification {
            id: self.next_id,
            message: message.into(),
            kind,
        });
        self.next_id
    }

    pub fn remove(&mut self, id: u64) -> Option<Notification> {
        let position = self.notifications.iter().position(|n| n.id == id)?;
        Some(self.notifications.remove(position))
    }

    /// Takes every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}
