// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::browser::BrowserConfig;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;

/// Default findings file
pub const DEFAULT_OUTPUT: &str = "result.txt";

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Percent-encoding rounds applied to every payload
    pub encoding_rounds: u32,
    /// Concurrent reflection probes
    pub http_concurrency: usize,
    /// Browser pool size
    pub browser_workers: usize,
    /// Connect and read timeout for probes
    pub http_timeout: Duration,
    /// Page load and dialog wait timeout for confirmations
    pub dialog_timeout: Duration,
    /// Upstream proxy for probes and browsers
    pub proxy: Option<String>,
    /// Findings file, one URL per line
    pub output: Option<PathBuf>,
    /// Chrome/Chromium executable
    pub chrome_path: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            encoding_rounds: 0,
            http_concurrency: 20,
            browser_workers: 5,
            http_timeout: Duration::from_secs(20),
            dialog_timeout: Duration::from_secs(2),
            proxy: None,
            output: Some(PathBuf::from(DEFAULT_OUTPUT)),
            chrome_path: None,
        }
    }
}

impl ScanConfig {
    /// Create a new scan config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set encoding rounds
    pub fn encoding_rounds(mut self, rounds: u32) -> Self {
        self.encoding_rounds = rounds;
        self
    }

    /// Set probe concurrency
    pub fn http_concurrency(mut self, workers: usize) -> Self {
        self.http_concurrency = workers;
        self
    }

    /// Set browser pool size
    pub fn browser_workers(mut self, workers: usize) -> Self {
        self.browser_workers = workers;
        self
    }

    /// Set probe timeout
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set dialog timeout
    pub fn dialog_timeout(mut self, timeout: Duration) -> Self {
        self.dialog_timeout = timeout;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set findings file, `None` to keep findings in memory only
    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    /// Set Chrome executable
    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Reject values that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.http_concurrency == 0 {
            return Err(Error::config("Number of threads must be at least 1"));
        }
        if self.browser_workers == 0 {
            return Err(Error::config("Number of browser workers must be at least 1"));
        }
        if self.http_timeout.is_zero() {
            return Err(Error::config("HTTP timeout must be at least 1 second"));
        }
        if self.dialog_timeout.is_zero() {
            return Err(Error::config("Browser timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// Client config for the probing stage
    pub fn http_client_config(&self) -> HttpClientConfig {
        let config = HttpClientConfig::with_timeout(self.http_timeout);
        match self.proxy {
            Some(ref proxy) => config.proxy(proxy.clone()),
            None => config,
        }
    }

    /// Browser config for the confirmation stage
    pub fn browser_config(&self) -> BrowserConfig {
        let mut config = BrowserConfig::for_confirmation().page_load_timeout(self.dialog_timeout);
        if let Some(ref path) = self.chrome_path {
            config = config.executable(path.clone());
        }
        if let Some(ref proxy) = self.proxy {
            config = config.proxy(proxy.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.http_concurrency, 20);
        assert_eq!(config.browser_workers, 5);
        assert_eq!(config.http_timeout, Duration::from_secs(20));
        assert_eq!(config.dialog_timeout, Duration::from_secs(2));
        assert_eq!(config.output, Some(PathBuf::from("result.txt")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(ScanConfig::new().http_concurrency(0).validate().is_err());
        assert!(ScanConfig::new().browser_workers(0).validate().is_err());
        assert!(ScanConfig::new().http_timeout(Duration::ZERO).validate().is_err());
        assert!(ScanConfig::new().dialog_timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_derived_configs() {
        let config = ScanConfig::new()
            .http_timeout(Duration::from_secs(7))
            .proxy("http://127.0.0.1:8080")
            .chrome_path("/usr/bin/chromium");

        let http = config.http_client_config();
        assert_eq!(http.connect_timeout, Duration::from_secs(7));
        assert_eq!(http.read_timeout, Duration::from_secs(7));
        assert_eq!(http.proxy.as_deref(), Some("http://127.0.0.1:8080"));

        let browser = config.browser_config();
        assert_eq!(browser.page_load_timeout, Duration::from_secs(2));
        assert_eq!(browser.executable, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(browser.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    }
}
