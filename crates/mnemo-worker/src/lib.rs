//! Mnemo Offline Worker
//!
//! Offline support for the Memory Training app: asset pre-caching at install,
//! cache-first fetch interception with network fallback and opportunistic
//! cache fill, stale generation cleanup at activation, a background sync
//! hook, and push reminder notifications with click routing.

pub mod cache;
pub mod clients;
pub mod config;
pub mod events;
pub mod gateway;
pub mod host;
pub mod notifications;
pub mod push;

pub use cache::{Cache, CacheStorage, CachedResponse};
pub use clients::{Client, ClientRegistry};
pub use config::WorkerConfig;
pub use events::{EventOutcome, NotificationClickEvent, SyncEvent, WorkerEvent};
pub use gateway::{CacheGateway, FetchOutcome, ServedFrom};
pub use host::{ServiceWorkerHost, ServiceWorkerState, WorkerStats};
pub use notifications::{
    Notification, NotificationAction, NotificationError, NotificationManager,
    NotificationOptions, NotificationPermission,
};
pub use push::{PushEvent, PushMessageData};

use mnemo_net::NetError;

/// Worker error
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("install failed: {0}")]
    InstallFailed(#[source] NetError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}
