// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::response::Response;
use super::{headers, RETRY_STATUSES, USER_AGENTS};
use crate::error::{Error, Result};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agents, one is picked at random per request
    pub user_agents: Vec<String>,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed for the response headers, then again for the body
    pub read_timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay, doubled after every retry
    pub backoff_factor: Duration,
    /// Statuses that are retried
    pub retry_statuses: Vec<u16>,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            headers::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            headers::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        Self {
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            connect_timeout: Duration::from_secs(20),
            read_timeout: Duration::from_secs(20),
            max_retries: 2,
            backoff_factor: Duration::from_millis(100),
            retry_statuses: RETRY_STATUSES.to_vec(),
            max_redirects: 10,
            accept_invalid_certs: false,
            default_headers,
            proxy: None,
        }
    }
}

impl HttpClientConfig {
    /// Config with the same timeout for connect and read
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            read_timeout: timeout,
            ..Default::default()
        }
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Delay before retry number `retry` (zero-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_factor.saturating_mul(1u32 << retry.min(16))
    }
}

/// Shared probing client
///
/// Configuration is immutable after construction; clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        if config.user_agents.is_empty() {
            return Err(Error::config("User agent pool is empty"));
        }

        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(config.default_headers.clone())
            .pool_max_idle_per_host(100);

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
            info!("Using proxy: {}", proxy_url);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Pick a user agent for the next request
    fn user_agent(&self) -> &str {
        self.config
            .user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(USER_AGENTS[0])
    }

    /// Execute a GET request, retrying gateway errors and transport faults
    pub async fn get(&self, url: &str) -> Result<Response> {
        let start = Instant::now();
        let mut retry = 0;

        loop {
            let attempt = retry + 1;
            match self.get_once(url).await {
                Ok((status, _, _)) if self.should_retry_status(status.as_u16()) => {
                    if retry >= self.config.max_retries {
                        return Err(Error::RetriesExhausted {
                            url: url.to_string(),
                            status: status.as_u16(),
                            attempts: attempt,
                        });
                    }
                    debug!("{} answered {}, retrying", url, status);
                }
                Ok((status, final_url, body)) => {
                    return Ok(Response {
                        status,
                        body,
                        url: final_url,
                        attempts: attempt,
                        response_time_ms: start.elapsed().as_millis() as u64,
                    });
                }
                Err(e) if retry < self.config.max_retries && is_retryable(&e) => {
                    debug!("{} failed ({}), retrying", url, e);
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.config.backoff(retry)).await;
            retry += 1;
        }
    }

    async fn get_once(&self, url: &str) -> Result<(StatusCode, Url, String)> {
        let read_ms = self.config.read_timeout.as_millis() as u64;

        let request = self
            .client
            .get(url)
            .header(headers::USER_AGENT, self.user_agent());

        let response = tokio::time::timeout(self.config.read_timeout, request.send())
            .await
            .map_err(|_| Error::timeout_with_url("read response headers", read_ms, url))??;

        let status = response.status();
        let final_url = response.url().clone();

        let body = tokio::time::timeout(self.config.read_timeout, response.bytes())
            .await
            .map_err(|_| Error::timeout_with_url("read response body", read_ms, url))??;

        Ok((status, final_url, String::from_utf8_lossy(&body).into_owned()))
    }

    fn should_retry_status(&self, status: u16) -> bool {
        self.config.retry_statuses.contains(&status)
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

/// Transport faults worth another attempt. TLS verification failures are not.
fn is_retryable(error: &Error) -> bool {
    match error {
        Error::Timeout { .. } => true,
        Error::Http(e) => (e.is_connect() || e.is_timeout()) && !mentions_tls(e),
        _ => false,
    }
}

/// Walk an error's source chain looking for a TLS/certificate cause.
///
/// The TLS layer reports handshake failures as `InvalidData` I/O errors;
/// plain TCP connects never do.
pub(crate) fn mentions_tls(error: &(dyn std::error::Error + 'static)) -> bool {
    source_chain_any(error, |err| {
        let io_invalid_data = err
            .downcast_ref::<std::io::Error>()
            .map_or(false, |io| io.kind() == std::io::ErrorKind::InvalidData);
        io_invalid_data
            || text_contains(
                err,
                &["certificate", "tls", "ssl", "handshake", "corrupt message"],
            )
    })
}

/// Walk an error's source chain looking for a name-resolution cause
pub(crate) fn mentions_dns(error: &(dyn std::error::Error + 'static)) -> bool {
    source_chain_any(error, |err| {
        text_contains(
            err,
            &["dns error", "failed to lookup", "name or service not known", "no such host"],
        )
    })
}

fn text_contains(error: &dyn std::error::Error, needles: &[&str]) -> bool {
    let text = error.to_string().to_lowercase();
    needles.iter().any(|n| text.contains(n))
}

fn source_chain_any(
    error: &(dyn std::error::Error + 'static),
    mut matches: impl FnMut(&(dyn std::error::Error + 'static)) -> bool,
) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = current {
        if matches(err) {
            return true;
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().max_retries, 2);
        assert_eq!(client.config().user_agents.len(), USER_AGENTS.len());
    }

    #[test]
    fn test_user_agent_drawn_from_pool() {
        let client = HttpClient::new().unwrap();
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&client.user_agent()));
        }
    }

    #[test]
    fn test_backoff_is_exponential() {
        let config = HttpClientConfig::default();
        assert_eq!(config.backoff(0), Duration::from_millis(100));
        assert_eq!(config.backoff(1), Duration::from_millis(200));
        assert_eq!(config.backoff(2), Duration::from_millis(400));
    }

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "error trying to connect")
        }
    }

    impl std::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_tls_cause_found_in_source_chain() {
        let handshake = Wrapped(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "received corrupt message of type InvalidContentType",
        ));
        assert!(mentions_tls(&handshake));
        assert!(!mentions_dns(&handshake));

        let refused = Wrapped(std::io::Error::from(std::io::ErrorKind::ConnectionRefused));
        assert!(!mentions_tls(&refused));
    }

    #[test]
    fn test_dns_cause_found_in_source_chain() {
        let lookup = Wrapped(std::io::Error::new(
            std::io::ErrorKind::Other,
            "dns error: failed to lookup address information: Name or service not known",
        ));
        assert!(mentions_dns(&lookup));
        assert!(!mentions_tls(&lookup));
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let config = HttpClientConfig::default().proxy("http://[::1");
        assert!(matches!(HttpClient::with_config(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_user_agent_pool_rejected() {
        let config = HttpClientConfig {
            user_agents: vec![],
            ..Default::default()
        };
        assert!(HttpClient::with_config(config).is_err());
    }
}
