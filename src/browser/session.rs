// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser session abstraction
//!
//! Sessions are synchronous and are driven from blocking tasks. A session is
//! only ever used by the worker that checked it out of the pool.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::error::Result;
use crate::xss::Dialog;

/// Neutral page a session returns to between confirmations
pub const BLANK_PAGE: &str = "about:blank";

/// Sending half of a dialog watch, held by the browser's event listener
#[derive(Clone)]
pub struct DialogSender(Sender<Dialog>);

impl DialogSender {
    /// Report a dialog; ignored once the watch is gone
    pub fn notify(&self, dialog: Dialog) {
        let _ = self.0.send(dialog);
    }
}

/// Proof that dialog interception is armed.
///
/// [`BrowserSession::navigate`] takes a watch, so a navigation that could
/// open a dialog cannot be issued before interception is installed.
pub struct DialogWatch {
    rx: Receiver<Dialog>,
}

impl DialogWatch {
    /// Create a connected sender and watch
    pub fn channel() -> (DialogSender, DialogWatch) {
        let (tx, rx) = mpsc::channel();
        (DialogSender(tx), DialogWatch { rx })
    }

    /// Block up to `timeout` for the next dialog
    pub fn wait(&self, timeout: Duration) -> Option<Dialog> {
        match self.rx.recv_timeout(timeout) {
            Ok(dialog) => Some(dialog),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Take a dialog that already arrived, without blocking
    pub fn try_next(&self) -> Option<Dialog> {
        self.rx.try_recv().ok()
    }
}

/// One live browser instance with its own profile
pub trait BrowserSession: Send {
    /// Install dialog interception and return the watch receiving dialogs
    fn arm(&mut self) -> Result<DialogWatch>;

    /// Navigate to `url`; returns once the navigation is committed
    fn navigate(&mut self, watch: &DialogWatch, url: &str, timeout: Duration) -> Result<()>;

    /// Accept the currently open dialog so the page is no longer blocked
    fn accept_dialog(&mut self) -> Result<()>;

    /// Remove dialog interception installed by [`BrowserSession::arm`]
    fn disarm(&mut self);

    /// Close any open dialog and navigate to [`BLANK_PAGE`]
    fn reset(&mut self) -> Result<()>;

    /// URL currently loaded
    fn current_url(&self) -> Option<String>;

    /// Check if the underlying browser process still answers
    fn is_alive(&self) -> bool;
}

/// Creates browser sessions for the pool
pub trait BrowserLauncher: Send + Sync + 'static {
    /// Launch a new session; `id` is unique within the pool
    fn launch(&self, id: usize) -> Result<Box<dyn BrowserSession>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xss::DialogKind;

    #[test]
    fn test_watch_receives_dialog() {
        let (tx, watch) = DialogWatch::channel();
        tx.notify(Dialog {
            kind: DialogKind::Confirm,
            message: "hi".into(),
        });

        let dialog = watch.wait(Duration::from_millis(10)).unwrap();
        assert_eq!(dialog.kind, DialogKind::Confirm);
        assert!(watch.try_next().is_none());
    }

    #[test]
    fn test_watch_times_out() {
        let (_tx, watch) = DialogWatch::channel();
        assert!(watch.wait(Duration::from_millis(5)).is_none());
    }

    #[test]
    fn test_dropped_watch_ignores_notify() {
        let (tx, watch) = DialogWatch::channel();
        drop(watch);
        tx.notify(Dialog {
            kind: DialogKind::Alert,
            message: String::new(),
        });
    }
}
