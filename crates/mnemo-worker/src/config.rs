//! Worker Configuration
//!
//! Deploy-time constants: cache generation, asset list, fallback document.
//! Changing the generation identifier retires every store left by earlier
//! deploys on the next activation.

/// Cache generation identifier for the current deploy
pub const CACHE_NAME: &str = "memory-training-pro-v2";

/// Document served when both cache and network miss
pub const FALLBACK_URL: &str = "/memory_training_extended.html";

/// Background sync tag for progress data
pub const SYNC_TAG: &str = "sync-progress";

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Cache generation identifier
    pub cache_name: String,
    /// Assets pre-cached at install
    pub precache: Vec<String>,
    /// Offline fallback document
    pub fallback_url: String,
    /// Page opened from a notification
    pub app_url: String,
    /// Background sync tag this worker answers to
    pub sync_tag: String,
    /// Origin the worker runs under
    pub origin: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            precache: vec![
                "/memory_training_extended.html".to_string(),
                "/manifest.json".to_string(),
            ],
            fallback_url: FALLBACK_URL.to_string(),
            app_url: "/memory_training_extended.html".to_string(),
            sync_tag: SYNC_TAG.to_string(),
            origin: "https://memory-training.app".to_string(),
        }
    }
}
