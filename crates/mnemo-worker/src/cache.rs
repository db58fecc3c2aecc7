//! Cache Storage
//!
//! Named request/response stores for offline support. Each store maps a
//! request identity (method plus URL) to the most recently stored response.

use std::collections::HashMap;

use mnemo_net::{Request, Response};

/// Container for named caches
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: HashMap<String, Cache>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or create a cache
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches.entry(name.to_string()).or_default()
    }

    /// Get a cache without creating it
    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    /// Check if cache exists
    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Delete a cache
    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// List all cache names
    pub fn keys(&self) -> Vec<&str> {
        self.caches.keys().map(|s| s.as_str()).collect()
    }
}

/// A single generation's request/response store
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: HashMap<String, CachedResponse>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response under the request's identity
    pub fn put(&mut self, request: &Request, response: CachedResponse) {
        self.entries.insert(request_key(request), response);
    }

    /// Exact-match lookup by method and URL
    pub fn match_request(&self, request: &Request) -> Option<&CachedResponse> {
        self.entries.get(&request_key(request))
    }

    /// Delete a stored response
    pub fn delete(&mut self, request: &Request) -> bool {
        self.entries.remove(&request_key(request)).is_some()
    }

    /// All stored request keys
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn request_key(request: &Request) -> String {
    format!("{} {}", request.method.as_str(), request.url)
}

/// A stored response
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body,
        }
    }

    /// Copy of a network response, suitable for storing
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            body: response.body.clone(),
        }
    }

    /// Body as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
