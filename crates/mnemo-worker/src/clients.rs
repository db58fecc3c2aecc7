//! Client Windows
//!
//! Registry of pages the worker controls and windows it opens.

use std::collections::HashMap;

/// A connected client window
#[derive(Debug, Clone)]
pub struct Client {
    pub id: u64,
    pub url: String,
    pub controlled: bool,
}

/// Client registry
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<u64, Client>,
    next_id: u64,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page that connected on its own
    pub fn connect(&mut self, url: &str) -> u64 {
        let id = self.alloc_id();
        self.clients.insert(
            id,
            Client {
                id,
                url: url.to_string(),
                controlled: false,
            },
        );
        id
    }

    /// Take control of every connected client
    pub fn claim(&mut self) -> usize {
        let mut claimed = 0;
        for client in self.clients.values_mut() {
            if !client.controlled {
                client.controlled = true;
                claimed += 1;
            }
        }
        claimed
    }

    /// Open a new window; windows the worker opens start controlled
    pub fn open_window(&mut self, url: &str) -> u64 {
        tracing::info!("opening window: {}", url);
        let id = self.alloc_id();
        self.clients.insert(
            id,
            Client {
                id,
                url: url.to_string(),
                controlled: true,
            },
        );
        id
    }

    pub fn get(&self, id: u64) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Number of clients this worker controls
    pub fn controlled_count(&self) -> usize {
        self.clients.values().filter(|c| c.controlled).count()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
