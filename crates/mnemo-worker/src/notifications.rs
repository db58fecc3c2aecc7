//! Reminder Notifications
//!
//! Notification descriptors and the display registry for training reminders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

static NOTIFICATION_ID: AtomicU64 = AtomicU64::new(1);

/// Title used for every reminder
pub const NOTIFICATION_TITLE: &str = "Memory Training";

/// Body shown when a push event carries no payload
pub const DEFAULT_REMINDER: &str = "Time for your daily brain training!";

/// Action identifier for jumping straight into a session
pub const ACTION_START: &str = "start";

/// Action identifier for postponing the reminder
pub const ACTION_LATER: &str = "later";

/// App icon, inline so it renders offline
pub const ICON_DATA_URL: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 192 192\"%3E%3Crect width=\"192\" height=\"192\" rx=\"24\" fill=\"%23FF6B35\"/%3E%3Ctext x=\"96\" y=\"130\" font-family=\"-apple-system\" font-size=\"100\" fill=\"white\" text-anchor=\"middle\"%3E\u{1F9E0}%3C/text%3E%3C/svg%3E";

/// Badge shown in the status bar
pub const BADGE_DATA_URL: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 96 96\"%3E%3Ccircle cx=\"48\" cy=\"48\" r=\"48\" fill=\"%23FF6B35\"/%3E%3C/svg%3E";

/// Notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Default,
    Granted,
    Denied,
}

/// Structured payload attached to a reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    pub date_of_arrival: u64,
    pub primary_key: u32,
}

impl NotificationData {
    /// Payload stamped with the current time
    pub fn arriving_now() -> Self {
        Self {
            date_of_arrival: now_millis(),
            primary_key: 1,
        }
    }
}

/// Notification options
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub tag: Option<String>,
    pub data: Option<NotificationData>,
    pub require_interaction: bool,
    pub silent: bool,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
}

/// Notification action button
#[derive(Debug, Clone)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: Option<String>,
}

impl NotificationAction {
    /// "Start Training" button
    pub fn start() -> Self {
        Self {
            action: ACTION_START.to_string(),
            title: "Start Training".to_string(),
            icon: Some("\u{26A1}".to_string()),
        }
    }

    /// "Remind Later" button
    pub fn remind_later() -> Self {
        Self {
            action: ACTION_LATER.to_string(),
            title: "Remind Later".to_string(),
            icon: Some("\u{23F0}".to_string()),
        }
    }
}

/// A notification instance
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub options: NotificationOptions,
    pub origin: String,
    pub timestamp: u64,
}

impl Notification {
    pub fn new(title: &str, options: NotificationOptions, origin: &str) -> Self {
        Self {
            id: NOTIFICATION_ID.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            options,
            origin: origin.to_string(),
            timestamp: now_millis(),
        }
    }

    /// JSON form of the attached data, for handing to a display surface
    pub fn data_json(&self) -> Option<String> {
        self.options
            .data
            .as_ref()
            .and_then(|d| serde_json::to_string(d).ok())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Display registry: per-origin permission plus the set of live notifications
#[derive(Debug, Default)]
pub struct NotificationManager {
    /// Permission per origin
    permissions: HashMap<String, NotificationPermission>,
    /// Active notifications
    active: HashMap<u64, Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request permission for an origin
    pub fn request_permission(&mut self, origin: &str) -> NotificationPermission {
        // No display surface to prompt from here, so grant directly
        let perm = NotificationPermission::Granted;
        self.permissions.insert(origin.to_string(), perm);
        perm
    }

    /// Check permission for an origin
    pub fn get_permission(&self, origin: &str) -> NotificationPermission {
        self.permissions
            .get(origin)
            .copied()
            .unwrap_or(NotificationPermission::Default)
    }

    /// Show a notification
    pub fn show(&mut self, notification: Notification) -> Result<u64, NotificationError> {
        if self.get_permission(&notification.origin) != NotificationPermission::Granted {
            return Err(NotificationError::PermissionDenied);
        }

        // A tagged notification replaces a live one with the same tag
        if let Some(ref tag) = notification.options.tag {
            self.active.retain(|_, n| {
                n.origin != notification.origin || n.options.tag.as_ref() != Some(tag)
            });
        }

        let id = notification.id;
        tracing::info!("showing notification {}: {}", id, notification.title);
        self.active.insert(id, notification);
        Ok(id)
    }

    /// Close a notification
    pub fn close(&mut self, id: u64) -> bool {
        if let Some(notification) = self.active.remove(&id) {
            tracing::debug!("closed notification {}", notification.id);
            true
        } else {
            false
        }
    }

    /// Get a live notification by id
    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.active.get(&id)
    }

    /// Get live notifications for an origin
    pub fn get_notifications(&self, origin: &str) -> Vec<&Notification> {
        self.active.values().filter(|n| n.origin == origin).collect()
    }
}

/// Notification errors
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification permission denied")]
    PermissionDenied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_requires_permission() {
        let mut mgr = NotificationManager::new();

        let n = Notification::new("Test", NotificationOptions::default(), "https://example.com");
        assert!(mgr.show(n).is_err());

        mgr.request_permission("https://example.com");

        let n = Notification::new("Test", NotificationOptions::default(), "https://example.com");
        let id = mgr.show(n).unwrap();
        assert!(mgr.close(id));
        assert!(!mgr.close(id));
    }

    #[test]
    fn test_tag_replaces_live_notification() {
        let mut mgr = NotificationManager::new();
        mgr.request_permission("https://example.com");

        let tagged = |body: &str| {
            let options = NotificationOptions {
                body: Some(body.to_string()),
                tag: Some("reminder".to_string()),
                ..Default::default()
            };
            Notification::new("Test", options, "https://example.com")
        };

        mgr.show(tagged("first")).unwrap();
        let second = mgr.show(tagged("second")).unwrap();

        let live = mgr.get_notifications("https://example.com");
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, second);
    }

    #[test]
    fn test_reminder_actions() {
        let start = NotificationAction::start();
        let later = NotificationAction::remind_later();

        assert_eq!(start.action, ACTION_START);
        assert_eq!(start.title, "Start Training");
        assert_eq!(later.action, ACTION_LATER);
    }

    #[test]
    fn test_data_json_round_trip() {
        let options = NotificationOptions {
            data: Some(NotificationData {
                date_of_arrival: 1700000000000,
                primary_key: 1,
            }),
            ..Default::default()
        };
        let n = Notification::new("Test", options, "https://example.com");

        let json = n.data_json().unwrap();
        let parsed: NotificationData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.primary_key, 1);
        assert_eq!(parsed.date_of_arrival, 1700000000000);
    }
}
