// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser launch configuration

use std::path::PathBuf;
use std::time::Duration;

/// Browser configuration
///
/// Dialogs are never handled by the browser runtime itself; every dialog stays
/// open until the confirmation engine accepts it.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Chrome/Chromium executable, autodetected when `None`
    pub executable: Option<PathBuf>,
    /// Run without a visible window
    pub headless: bool,
    /// Chrome sandbox (off for containers and root)
    pub sandbox: bool,
    /// Load images
    pub images_enabled: bool,
    /// Allow background networking (updates, safe browsing, metrics)
    pub background_networking: bool,
    /// Timeout for page loads
    pub page_load_timeout: Duration,
    /// Browser is closed by the driver after this long without events
    pub idle_timeout: Duration,
    /// Proxy server
    pub proxy: Option<String>,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
    /// Window size
    pub window_size: (u32, u32),
    /// Extra command line switches
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            sandbox: false,
            images_enabled: false,
            background_networking: false,
            page_load_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(3600),
            proxy: None,
            ignore_https_errors: false,
            window_size: (1280, 800),
            extra_args: vec![],
        }
    }
}

impl BrowserConfig {
    /// Create a new browser config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Chrome executable
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Set page load timeout
    pub fn page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add a command line switch
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Config for dialog confirmation: headless, sandboxless, no images,
    /// no background traffic
    pub fn for_confirmation() -> Self {
        Self::default()
    }

    /// Command line switches derived from this config
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-extensions".to_string(),
            "--disable-component-update".to_string(),
        ];
        if !self.images_enabled {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }
        if !self.background_networking {
            args.push("--disable-background-networking".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_defaults() {
        let config = BrowserConfig::for_confirmation();
        assert!(config.headless);
        assert!(!config.sandbox);

        let args = config.launch_args();
        assert!(args.contains(&"--blink-settings=imagesEnabled=false".to_string()));
        assert!(args.contains(&"--disable-background-networking".to_string()));
    }

    #[test]
    fn test_builder() {
        let config = BrowserConfig::new()
            .executable("/opt/chrome/chrome")
            .page_load_timeout(Duration::from_secs(5))
            .arg("--lang=en-US");

        assert_eq!(config.executable, Some(PathBuf::from("/opt/chrome/chrome")));
        assert_eq!(config.page_load_timeout, Duration::from_secs(5));
        assert_eq!(config.launch_args().last().map(String::as_str), Some("--lang=en-US"));
    }
}
