// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser confirmation through dialog interception
//!
//! Each attempt runs `arm -> navigate -> wait for dialog -> disarm -> reset`
//! on one pooled browser. Per-candidate failures are outcomes, not errors.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Candidate, Dialog};
use crate::browser::{BrowserSession, PooledBrowser};

/// How a confirmation attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationOutcome {
    /// A dialog fired and was accepted
    DialogObserved,
    /// Page loaded but no dialog appeared in time
    TimedOut,
    /// Browser could not load the URL
    NavigationFailed(String),
    /// Browser or driver misbehaved
    BrowserFault(String),
}

/// Result of confirming one reflected candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResult {
    /// Script executed in the browser
    pub exploitable: bool,
    /// Dialog captured, when one fired
    pub dialog: Option<Dialog>,
    /// How the attempt ended
    pub outcome: ConfirmationOutcome,
}

impl ConfirmationResult {
    /// A dialog proved execution
    pub fn dialog(dialog: Dialog) -> Self {
        Self {
            exploitable: true,
            dialog: Some(dialog),
            outcome: ConfirmationOutcome::DialogObserved,
        }
    }

    /// No dialog within the wait
    pub fn timed_out() -> Self {
        Self::not_exploitable(ConfirmationOutcome::TimedOut)
    }

    /// Navigation failed
    pub fn navigation_failed(reason: impl Into<String>) -> Self {
        Self::not_exploitable(ConfirmationOutcome::NavigationFailed(reason.into()))
    }

    /// Browser fault
    pub fn browser_fault(reason: impl Into<String>) -> Self {
        Self::not_exploitable(ConfirmationOutcome::BrowserFault(reason.into()))
    }

    fn not_exploitable(outcome: ConfirmationOutcome) -> Self {
        Self {
            exploitable: false,
            dialog: None,
            outcome,
        }
    }

    /// Captured dialog text
    pub fn dialog_text(&self) -> Option<&str> {
        self.dialog.as_ref().map(|d| d.message.as_str())
    }
}

/// Drives confirmation attempts on pooled browsers
#[derive(Debug, Clone)]
pub struct ConfirmationEngine {
    page_load_timeout: Duration,
}

impl ConfirmationEngine {
    /// Create an engine; `page_load_timeout` bounds each navigation
    pub fn new(page_load_timeout: Duration) -> Self {
        Self { page_load_timeout }
    }

    /// Get page load timeout
    pub fn page_load_timeout(&self) -> Duration {
        self.page_load_timeout
    }

    /// Confirm `candidate` on the browser held by `lease`, waiting up to
    /// `timeout` for a dialog after the navigation commits.
    ///
    /// The browser is reset to a blank page before this returns, whatever
    /// the outcome. A failed reset leaves the handle marked dirty so the
    /// pool resets or replaces it.
    pub async fn confirm(
        &self,
        lease: &mut PooledBrowser,
        candidate: &Candidate,
        timeout: Duration,
    ) -> ConfirmationResult {
        let Some(mut handle) = lease.take_handle() else {
            return ConfirmationResult::browser_fault("lease holds no browser");
        };

        let url = candidate.url.clone();
        let load_timeout = self.page_load_timeout;

        let joined = tokio::task::spawn_blocking(move || {
            let result = run_attempt(handle.session_mut(), &url, load_timeout, timeout);
            if let Err(e) = handle.reset() {
                warn!("Browser #{} did not return to a blank page: {}", handle.id(), e);
            }
            (handle, result)
        })
        .await;

        match joined {
            Ok((handle, result)) => {
                lease.restore_handle(handle);
                debug!("Confirmation of {}: {:?}", candidate.url, result.outcome);
                result
            }
            Err(e) => {
                warn!("Confirmation task for {} failed: {}", candidate.url, e);
                ConfirmationResult::browser_fault(e.to_string())
            }
        }
    }
}

/// One armed navigation. Leaves the session disarmed, not reset.
pub(crate) fn run_attempt(
    session: &mut dyn BrowserSession,
    url: &str,
    load_timeout: Duration,
    dialog_timeout: Duration,
) -> ConfirmationResult {
    let watch = match session.arm() {
        Ok(watch) => watch,
        Err(e) => return ConfirmationResult::browser_fault(e.to_string()),
    };

    let result = match session.navigate(&watch, url, load_timeout) {
        Ok(()) => match watch.wait(dialog_timeout) {
            Some(dialog) => accept(session, dialog),
            None => ConfirmationResult::timed_out(),
        },
        // A dialog opened during load blocks the navigation from completing.
        Err(e) => match watch.try_next() {
            Some(dialog) => accept(session, dialog),
            None => ConfirmationResult::navigation_failed(e.to_string()),
        },
    };

    session.disarm();
    result
}

fn accept(session: &mut dyn BrowserSession, dialog: Dialog) -> ConfirmationResult {
    if let Err(e) = session.accept_dialog() {
        debug!("Dialog already closed: {}", e);
    }
    ConfirmationResult::dialog(dialog)
}
