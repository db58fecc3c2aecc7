//! Cache Gateway
//!
//! Intercepts resource requests for the app: cache-first lookup, network
//! fallback with opportunistic cache fill, offline fallback document.

use mnemo_net::{Fetch, NetError, Request, Response, ResponseKind};

use crate::cache::{Cache, CacheStorage, CachedResponse};
use crate::config::WorkerConfig;

/// Where an intercepted request was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
    Fallback,
}

/// Response produced by fetch interception
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: CachedResponse,
    pub served: ServedFrom,
}

/// Cache gateway for the offline worker
#[derive(Debug)]
pub struct CacheGateway {
    storage: CacheStorage,
    cache_name: String,
    precache: Vec<String>,
    fallback_url: String,
}

impl CacheGateway {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            storage: CacheStorage::new(),
            cache_name: config.cache_name.clone(),
            precache: config.precache.clone(),
            fallback_url: config.fallback_url.clone(),
        }
    }

    /// Pre-cache the fixed asset list under the current generation.
    ///
    /// Nothing is committed unless every asset loads with a success status;
    /// one failed asset aborts the whole phase.
    pub fn install(&mut self, net: &mut impl Fetch) -> Result<(), NetError> {
        let mut fetched = Vec::with_capacity(self.precache.len());
        for url in &self.precache {
            let req = Request::get(url);
            let response = net.fetch(&req)?;
            if !response.is_success() {
                return Err(NetError::HttpError {
                    status: response.status,
                });
            }
            fetched.push((req, response));
        }

        let cache = self.storage.open(&self.cache_name);
        for (req, response) in fetched {
            cache.put(&req, CachedResponse::from_response(&response));
        }
        tracing::info!("pre-cached {} assets into {}", cache.len(), self.cache_name);
        Ok(())
    }

    /// Drop every store left by a previous generation
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|name| *name != self.cache_name)
            .map(String::from)
            .collect();

        for name in &stale {
            tracing::info!("deleting old cache: {}", name);
            self.storage.delete(name);
        }
        stale
    }

    /// Serve an intercepted request: cache hit, then network, then fallback
    pub fn fetch(&mut self, net: &mut impl Fetch, req: &Request) -> Result<FetchOutcome, NetError> {
        if let Some(hit) = self.current().and_then(|cache| cache.match_request(req)) {
            tracing::debug!("cache hit: {}", req.url);
            return Ok(FetchOutcome {
                response: hit.clone(),
                served: ServedFrom::Cache,
            });
        }

        match net.fetch(req) {
            Ok(response) => {
                let out = CachedResponse::from_response(&response);
                if Self::should_cache(&response) {
                    self.storage.open(&self.cache_name).put(req, out.clone());
                }
                Ok(FetchOutcome {
                    response: out,
                    served: ServedFrom::Network,
                })
            }
            Err(err) => {
                let fallback = Request::get(&self.fallback_url);
                if let Some(doc) = self.current().and_then(|cache| cache.match_request(&fallback)) {
                    tracing::warn!("offline, serving fallback for {}: {}", req.url, err);
                    Ok(FetchOutcome {
                        response: doc.clone(),
                        served: ServedFrom::Fallback,
                    })
                } else {
                    Err(err)
                }
            }
        }
    }

    // Only successful same-origin responses are kept
    fn should_cache(response: &Response) -> bool {
        response.status == 200 && response.kind == ResponseKind::Basic
    }

    fn current(&self) -> Option<&Cache> {
        self.storage.get(&self.cache_name)
    }

    /// Request keys present in the current generation
    pub fn cached_keys(&self) -> Vec<String> {
        self.current()
            .map(|cache| cache.keys().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut CacheStorage {
        &mut self.storage
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeNet {
        responses: HashMap<String, Response>,
        offline: bool,
        calls: usize,
    }

    impl FakeNet {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                offline: false,
                calls: 0,
            }
        }

        fn serve(&mut self, url: &str, body: &[u8]) {
            self.serve_with(url, 200, ResponseKind::Basic, body);
        }

        fn serve_with(&mut self, url: &str, status: u16, kind: ResponseKind, body: &[u8]) {
            self.responses.insert(
                url.to_string(),
                Response {
                    status,
                    status_text: String::new(),
                    headers: vec![],
                    body: body.to_vec(),
                    kind,
                },
            );
        }
    }

    impl Fetch for FakeNet {
        fn fetch(&mut self, req: &Request) -> Result<Response, NetError> {
            self.calls += 1;
            if self.offline {
                return Err(NetError::Network("offline".to_string()));
            }
            Ok(self.responses.get(&req.url).cloned().unwrap_or(Response {
                status: 404,
                status_text: "Not Found".to_string(),
                headers: vec![],
                body: vec![],
                kind: ResponseKind::Basic,
            }))
        }
    }

    fn ready() -> (CacheGateway, FakeNet) {
        let config = WorkerConfig::default();
        let mut net = FakeNet::new();
        for url in &config.precache {
            net.serve(url, format!("body of {}", url).as_bytes());
        }
        (CacheGateway::new(&config), net)
    }

    #[test]
    fn test_install_populates_current_generation() {
        let (mut gw, mut net) = ready();

        gw.install(&mut net).unwrap();

        let cache = gw.storage().get(gw.cache_name()).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.match_request(&Request::get("/manifest.json")).is_some());
    }

    #[test]
    fn test_install_aborts_on_failed_asset() {
        let config = WorkerConfig::default();
        let mut net = FakeNet::new();
        net.serve("/memory_training_extended.html", b"<html>");
        // /manifest.json left unserved, comes back 404

        let mut gw = CacheGateway::new(&config);
        assert!(gw.install(&mut net).is_err());
        // No partially populated store under the new generation
        assert!(!gw.storage().has(gw.cache_name()));
    }

    #[test]
    fn test_activate_drops_stale_generations() {
        let (mut gw, mut net) = ready();
        gw.install(&mut net).unwrap();
        gw.storage_mut().open("memory-training-pro-v1");
        gw.storage_mut().open("memory-training-beta");

        let stale = gw.activate();

        assert_eq!(stale.len(), 2);
        assert_eq!(gw.storage().keys(), vec![gw.cache_name()]);
    }

    #[test]
    fn test_hit_serves_cache_without_network() {
        let (mut gw, mut net) = ready();
        gw.install(&mut net).unwrap();
        let calls_after_install = net.calls;

        let out = gw.fetch(&mut net, &Request::get("/manifest.json")).unwrap();

        assert_eq!(out.served, ServedFrom::Cache);
        assert_eq!(out.response.text(), "body of /manifest.json");
        assert_eq!(net.calls, calls_after_install);
    }

    #[test]
    fn test_miss_fetches_and_fills_cache() {
        let (mut gw, mut net) = ready();
        gw.install(&mut net).unwrap();
        net.serve("/progress.json", b"{\"streak\":4}");

        let first = gw.fetch(&mut net, &Request::get("/progress.json")).unwrap();
        assert_eq!(first.served, ServedFrom::Network);

        let second = gw.fetch(&mut net, &Request::get("/progress.json")).unwrap();
        assert_eq!(second.served, ServedFrom::Cache);
        assert_eq!(second.response.body, b"{\"streak\":4}");
    }

    #[test]
    fn test_non_success_response_is_not_cached() {
        let (mut gw, mut net) = ready();
        gw.install(&mut net).unwrap();

        let out = gw.fetch(&mut net, &Request::get("/missing.png")).unwrap();
        assert_eq!(out.served, ServedFrom::Network);
        assert_eq!(out.response.status, 404);

        // Still a miss on the second try
        let again = gw.fetch(&mut net, &Request::get("/missing.png")).unwrap();
        assert_eq!(again.served, ServedFrom::Network);
    }

    #[test]
    fn test_cross_origin_response_is_not_cached() {
        let (mut gw, mut net) = ready();
        gw.install(&mut net).unwrap();
        net.serve_with("https://cdn.example.com/font.woff2", 200, ResponseKind::Cors, b"font");

        let out = gw
            .fetch(&mut net, &Request::get("https://cdn.example.com/font.woff2"))
            .unwrap();
        assert_eq!(out.served, ServedFrom::Network);

        let again = gw
            .fetch(&mut net, &Request::get("https://cdn.example.com/font.woff2"))
            .unwrap();
        assert_eq!(again.served, ServedFrom::Network);
    }

    #[test]
    fn test_offline_serves_fallback_document() {
        let (mut gw, mut net) = ready();
        gw.install(&mut net).unwrap();
        net.offline = true;

        let out = gw.fetch(&mut net, &Request::get("/levels/5")).unwrap();

        assert_eq!(out.served, ServedFrom::Fallback);
        assert_eq!(out.response.text(), "body of /memory_training_extended.html");
    }

    #[test]
    fn test_offline_without_fallback_propagates_error() {
        let config = WorkerConfig::default();
        let mut gw = CacheGateway::new(&config);
        let mut net = FakeNet::new();
        net.offline = true;

        let err = gw.fetch(&mut net, &Request::get("/levels/5")).unwrap_err();
        assert!(matches!(err, NetError::Network(_)));
    }

    #[test]
    fn test_cached_keys_lists_current_store() {
        let (mut gw, mut net) = ready();
        assert!(gw.cached_keys().is_empty());

        gw.install(&mut net).unwrap();

        let keys = gw.cached_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().any(|k| k.ends_with("/manifest.json")));
    }
}
