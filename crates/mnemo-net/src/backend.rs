//! Network Backend
//!
//! Pluggable transport behind the worker's fetch path. The real backend runs
//! over reqwest (blocking for simplicity); tests substitute an in-memory one.

use url::Url;

use crate::loader::{Method, Request};
use crate::{NetError, Response, ResponseKind};

/// Transport used for real network requests.
///
/// Transport failure (offline, DNS, refused connection) is an `Err`; an HTTP
/// response with any status is an `Ok`.
pub trait Fetch {
    fn fetch(&mut self, req: &Request) -> Result<Response, NetError>;
}

/// HTTP backend bound to the worker's origin
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base: Url,
}

impl HttpBackend {
    /// Create a backend resolving relative URLs against `base`
    pub fn new(base: Url) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mnemo/0.1")
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }

    fn resolve(&self, target: &str) -> Result<Url, NetError> {
        self.base
            .join(target)
            .map_err(|e| NetError::InvalidUrl(format!("{}: {}", target, e)))
    }
}

impl Fetch for HttpBackend {
    fn fetch(&mut self, req: &Request) -> Result<Response, NetError> {
        let url = self.resolve(&req.url)?;
        tracing::info!("HTTP {:?} {}", req.method, url);

        let method = match req.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, url);
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &req.body {
            builder = builder.body(body.clone());
        }

        let resp = builder.send().map_err(|e| NetError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let status_text = resp
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        // Redirects may land cross-origin; classify by the final URL
        let kind = if resp.url().origin() == self.base.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };
        let body = resp
            .bytes()
            .map_err(|e| NetError::Network(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            status_text,
            headers,
            body,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_url() {
        let base = Url::parse("https://memory-training.app/").unwrap();
        let backend = HttpBackend::new(base).unwrap();

        let url = backend.resolve("/manifest.json").unwrap();
        assert_eq!(url.as_str(), "https://memory-training.app/manifest.json");
    }

    #[test]
    fn test_resolve_absolute_url() {
        let base = Url::parse("https://memory-training.app/").unwrap();
        let backend = HttpBackend::new(base).unwrap();

        let url = backend.resolve("https://cdn.example.com/font.woff2").unwrap();
        assert_eq!(url.origin().ascii_serialization(), "https://cdn.example.com");
    }
}
