//! Worker Host
//!
//! Explicit dispatcher for platform events: one table from event kind to
//! handler, constructed once, no global listener state. Each handler's work
//! runs to completion inside `dispatch`, so a returned `Ok` means the event
//! has fully settled.

use mnemo_net::{Fetch, Request};

use crate::WorkerError;
use crate::clients::ClientRegistry;
use crate::config::WorkerConfig;
use crate::events::{EventOutcome, NotificationClickEvent, SyncEvent, WorkerEvent};
use crate::gateway::{CacheGateway, FetchOutcome, ServedFrom};
use crate::notifications::{
    ACTION_LATER, ACTION_START, BADGE_DATA_URL, DEFAULT_REMINDER, ICON_DATA_URL, Notification,
    NotificationAction, NotificationData, NotificationManager, NotificationOptions,
    NOTIFICATION_TITLE,
};
use crate::push::PushEvent;

/// Service worker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceWorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// Counters for dispatched work
#[derive(Debug, Clone, Default)]
pub struct WorkerStats {
    pub events_handled: u64,
    pub cache_hits: u64,
    pub network_fetches: u64,
    pub fallbacks_served: u64,
    pub notifications_shown: u64,
}

/// The worker: owns the cache gateway, notification registry and client
/// registry, and routes each platform event to its handler.
pub struct ServiceWorkerHost<N: Fetch> {
    config: WorkerConfig,
    state: ServiceWorkerState,
    skip_waiting: bool,
    gateway: CacheGateway,
    notifications: NotificationManager,
    clients: ClientRegistry,
    net: N,
    stats: WorkerStats,
}

impl<N: Fetch> ServiceWorkerHost<N> {
    pub fn new(config: WorkerConfig, net: N) -> Self {
        let mut notifications = NotificationManager::new();
        notifications.request_permission(&config.origin);

        Self {
            gateway: CacheGateway::new(&config),
            state: ServiceWorkerState::Parsed,
            skip_waiting: false,
            notifications,
            clients: ClientRegistry::new(),
            net,
            stats: WorkerStats::default(),
            config,
        }
    }

    /// Route an event to its handler and run the work to completion
    pub fn dispatch(&mut self, event: WorkerEvent) -> Result<EventOutcome, WorkerError> {
        tracing::debug!("dispatching {} event", event.kind());
        self.stats.events_handled += 1;

        match event {
            WorkerEvent::Install => self.on_install().map(|_| EventOutcome::Done),
            WorkerEvent::Activate => self.on_activate().map(|_| EventOutcome::Done),
            WorkerEvent::Fetch(req) => self.on_fetch(&req).map(EventOutcome::Response),
            WorkerEvent::Sync(ev) => self.on_sync(&ev).map(|_| EventOutcome::Done),
            WorkerEvent::Push(ev) => self.on_push(ev).map(EventOutcome::NotificationShown),
            WorkerEvent::NotificationClick(ev) => {
                self.on_notification_click(&ev).map(|_| EventOutcome::Done)
            }
        }
    }

    fn on_install(&mut self) -> Result<(), WorkerError> {
        self.state = ServiceWorkerState::Installing;

        if let Err(err) = self.gateway.install(&mut self.net) {
            self.state = ServiceWorkerState::Redundant;
            return Err(WorkerError::InstallFailed(err));
        }

        self.state = ServiceWorkerState::Installed;
        // Supersede a previous worker without waiting for its clients to close
        self.skip_waiting = true;
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), WorkerError> {
        self.state = ServiceWorkerState::Activating;

        let stale = self.gateway.activate();
        if !stale.is_empty() {
            tracing::info!("dropped {} stale cache generation(s)", stale.len());
        }

        let claimed = self.clients.claim();
        tracing::debug!("claimed {} client(s)", claimed);

        self.state = ServiceWorkerState::Activated;
        Ok(())
    }

    fn on_fetch(&mut self, req: &Request) -> Result<FetchOutcome, WorkerError> {
        let outcome = self.gateway.fetch(&mut self.net, req)?;
        match outcome.served {
            ServedFrom::Cache => self.stats.cache_hits += 1,
            ServedFrom::Network => self.stats.network_fetches += 1,
            ServedFrom::Fallback => self.stats.fallbacks_served += 1,
        }
        Ok(outcome)
    }

    fn on_sync(&mut self, event: &SyncEvent) -> Result<(), WorkerError> {
        if event.tag != self.config.sync_tag {
            tracing::debug!("ignoring sync event with tag {}", event.tag);
            return Ok(());
        }

        let keys = self.gateway.cached_keys();
        tracing::info!("syncing progress data ({} cached entries)", keys.len());
        // Extension point: push local progress to the backend API once online
        Ok(())
    }

    fn on_push(&mut self, event: PushEvent) -> Result<u64, WorkerError> {
        let body = match &event.data {
            Some(data) => data.text(),
            None => DEFAULT_REMINDER.to_string(),
        };

        let options = NotificationOptions {
            body: Some(body),
            icon: Some(ICON_DATA_URL.to_string()),
            badge: Some(BADGE_DATA_URL.to_string()),
            vibrate: vec![200, 100, 200],
            data: Some(NotificationData::arriving_now()),
            actions: vec![
                NotificationAction::start(),
                NotificationAction::remind_later(),
            ],
            ..Default::default()
        };

        let notification = Notification::new(NOTIFICATION_TITLE, options, &self.config.origin);
        let id = self.notifications.show(notification)?;
        self.stats.notifications_shown += 1;
        Ok(id)
    }

    fn on_notification_click(&mut self, event: &NotificationClickEvent) -> Result<(), WorkerError> {
        self.notifications.close(event.notification_id);

        match event.action.as_deref() {
            Some(ACTION_START) => {
                let url = format!("{}?quick=true", self.config.app_url);
                self.clients.open_window(&url);
            }
            Some(ACTION_LATER) => {
                // Extension point: schedule another reminder in an hour
                tracing::info!("rescheduling reminder");
            }
            _ => {
                self.clients.open_window(&self.config.app_url);
            }
        }
        Ok(())
    }

    pub fn state(&self) -> ServiceWorkerState {
        self.state
    }

    /// Whether this worker asked to supersede a previous instance immediately
    pub fn skip_waiting(&self) -> bool {
        self.skip_waiting
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn gateway(&self) -> &CacheGateway {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut CacheGateway {
        &mut self.gateway
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn clients_mut(&mut self) -> &mut ClientRegistry {
        &mut self.clients
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn net(&self) -> &N {
        &self.net
    }

    pub fn net_mut(&mut self) -> &mut N {
        &mut self.net
    }
}
