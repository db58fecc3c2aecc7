//! Worker Events
//!
//! The event kinds the host platform delivers, and what dispatching one
//! produces. The dispatcher routes each kind to exactly one handler.

use mnemo_net::Request;

use crate::gateway::FetchOutcome;
use crate::push::PushEvent;

/// An event delivered to the worker
#[derive(Debug)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(Request),
    Sync(SyncEvent),
    Push(PushEvent),
    NotificationClick(NotificationClickEvent),
}

impl WorkerEvent {
    /// Event kind name, matching the platform's event naming
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Sync(_) => "sync",
            WorkerEvent::Push(_) => "push",
            WorkerEvent::NotificationClick(_) => "notificationclick",
        }
    }
}

/// Background sync event
#[derive(Debug, Clone)]
pub struct SyncEvent {
    pub tag: String,
}

impl SyncEvent {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
        }
    }
}

/// Click on a displayed notification, possibly on one of its action buttons
#[derive(Debug, Clone)]
pub struct NotificationClickEvent {
    pub notification_id: u64,
    pub action: Option<String>,
}

impl NotificationClickEvent {
    /// Click on the notification body itself
    pub fn body(notification_id: u64) -> Self {
        Self {
            notification_id,
            action: None,
        }
    }

    /// Click on a specific action button
    pub fn action(notification_id: u64, action: &str) -> Self {
        Self {
            notification_id,
            action: Some(action.to_string()),
        }
    }
}

/// Result of dispatching an event
#[derive(Debug)]
pub enum EventOutcome {
    /// Event work ran to completion
    Done,
    /// Fetch interception produced a response
    Response(FetchOutcome),
    /// Push produced a visible notification
    NotificationShown(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(WorkerEvent::Install.kind(), "install");
        assert_eq!(WorkerEvent::Activate.kind(), "activate");
        assert_eq!(WorkerEvent::Sync(SyncEvent::new("sync-progress")).kind(), "sync");
        assert_eq!(
            WorkerEvent::NotificationClick(NotificationClickEvent::body(1)).kind(),
            "notificationclick"
        );
    }
}
