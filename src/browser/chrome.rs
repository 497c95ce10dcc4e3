// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Headless Chrome sessions

use std::ffi::OsStr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use headless_chrome::browser::tab::EventListener;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::Page::HandleJavaScriptDialog;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tempfile::TempDir;
use tracing::{debug, warn};

use super::config::BrowserConfig;
use super::session::{BrowserLauncher, BrowserSession, DialogWatch, BLANK_PAGE};
use crate::error::{Error, Result};
use crate::xss::{Dialog, DialogKind};

type DialogListener = dyn EventListener<Event> + Send + Sync;

/// Launches one Chrome process per session, each with a throwaway profile
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    /// Create a launcher
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Get launch config
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

impl BrowserLauncher for ChromeLauncher {
    fn launch(&self, id: usize) -> Result<Box<dyn BrowserSession>> {
        let profile = tempfile::Builder::new()
            .prefix(&format!("lazyxss-profile-{}-", id))
            .tempdir()?;

        let arg_strings = self.config.launch_args();
        let args: Vec<&OsStr> = arg_strings.iter().map(OsStr::new).collect();

        let options = LaunchOptions::default_builder()
            .headless(self.config.headless)
            .sandbox(self.config.sandbox)
            .path(self.config.executable.clone())
            .user_data_dir(Some(profile.path().to_path_buf()))
            .window_size(Some(self.config.window_size))
            .idle_browser_timeout(self.config.idle_timeout)
            .ignore_certificate_errors(self.config.ignore_https_errors)
            .proxy_server(self.config.proxy.as_deref())
            .args(args)
            .build()
            .map_err(|e| Error::browser(format!("Browser launch options error: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| Error::browser(format!("Failed to launch Chrome/Chromium: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::browser(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(self.config.page_load_timeout);

        debug!(
            "Launched browser #{} (pid {:?}, profile {})",
            id,
            browser.get_process_id(),
            profile.path().display()
        );

        Ok(Box::new(ChromeSession {
            id,
            tab,
            listener: None,
            browser,
            profile,
        }))
    }
}

/// One Chrome process, its tab, and its profile directory.
///
/// Field order matters on drop: the process is killed before the profile
/// directory is removed.
pub struct ChromeSession {
    id: usize,
    tab: Arc<Tab>,
    listener: Option<Weak<DialogListener>>,
    browser: Browser,
    profile: TempDir,
}

impl ChromeSession {
    fn handle_dialog(&self, accept: bool) -> Result<()> {
        self.tab
            .call_method(HandleJavaScriptDialog {
                accept,
                prompt_text: None,
            })
            .map(|_| ())
            .map_err(|e| Error::browser(format!("No dialog to handle: {}", e)))
    }
}

impl BrowserSession for ChromeSession {
    fn arm(&mut self) -> Result<DialogWatch> {
        self.disarm();

        let (tx, watch) = DialogWatch::channel();
        let listener: Arc<DialogListener> = Arc::new(move |event: &Event| {
            if let Event::PageJavascriptDialogOpening(opening) = event {
                if let Some(dialog) = dialog_from_params(&opening.params) {
                    tx.notify(dialog);
                }
            }
        });

        let weak = self
            .tab
            .add_event_listener(listener)
            .map_err(|e| Error::browser(format!("Failed to install dialog listener: {}", e)))?;
        self.listener = Some(weak);
        Ok(watch)
    }

    fn navigate(&mut self, _watch: &DialogWatch, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .map(|_| ())
            .map_err(|e| Error::navigation_failed(url, e.to_string()))
    }

    fn accept_dialog(&mut self) -> Result<()> {
        self.handle_dialog(true)
    }

    fn disarm(&mut self) {
        if let Some(weak) = self.listener.take() {
            if let Err(e) = self.tab.remove_event_listener(&weak) {
                debug!("Browser #{}: dialog listener already gone: {}", self.id, e);
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        // A page may keep raising dialogs; any open one blocks navigation.
        for _ in 0..3 {
            if self.handle_dialog(false).is_err() {
                break;
            }
        }

        self.tab
            .navigate_to(BLANK_PAGE)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| Error::navigation_failed(BLANK_PAGE, e.to_string()))?;

        let url = self.tab.get_url();
        if url != BLANK_PAGE {
            warn!("Browser #{} reset landed on {}", self.id, url);
            return Err(Error::navigation_failed(BLANK_PAGE, format!("landed on {}", url)));
        }
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        Some(self.tab.get_url())
    }

    fn is_alive(&self) -> bool {
        self.browser.get_version().is_ok()
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        debug!(
            "Destroying browser #{} (profile {})",
            self.id,
            self.profile.path().display()
        );
    }
}

/// Read a dialog out of CDP event params by their wire names
fn dialog_from_params<P: serde::Serialize>(params: &P) -> Option<Dialog> {
    let value = serde_json::to_value(params).ok()?;
    let kind = match value.get("type").and_then(|t| t.as_str()) {
        Some("confirm") => DialogKind::Confirm,
        Some("prompt") => DialogKind::Prompt,
        Some("beforeunload") => DialogKind::BeforeUnload,
        _ => DialogKind::Alert,
    };
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();
    Some(Dialog { kind, message })
}
