// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared test fixtures: a scripted browser and reflecting servers

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use lazyxss::browser::{DialogSender, BLANK_PAGE};
use lazyxss::{
    decode, BrowserLauncher, BrowserSession, CancelSignal, Dialog, DialogKind, DialogWatch, Result,
};

/// Observations shared by every fake browser of one pool
#[derive(Default)]
pub struct BrowserState {
    pub launched: AtomicUsize,
    pub navigations: AtomicUsize,
    pub resets: AtomicUsize,
    pub dialogs: AtomicUsize,
    pub dead: AtomicBool,
    /// Raise this signal when navigation number `n` (1-based) starts
    pub cancel_at: Mutex<Option<(usize, CancelSignal)>>,
    pub visited: Mutex<Vec<String>>,
}

impl BrowserState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn cancel_on_navigation(&self, n: usize, signal: CancelSignal) {
        *self.cancel_at.lock() = Some((n, signal));
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }
}

/// Browser that "executes" a page by looking for `<script>alert(..)</script>`
/// in the percent-decoded URL
pub struct FakeSession {
    state: Arc<BrowserState>,
    url: String,
    sender: Option<DialogSender>,
}

impl BrowserSession for FakeSession {
    fn arm(&mut self) -> Result<DialogWatch> {
        let (tx, watch) = DialogWatch::channel();
        self.sender = Some(tx);
        Ok(watch)
    }

    fn navigate(&mut self, _watch: &DialogWatch, url: &str, _timeout: Duration) -> Result<()> {
        let n = self.state.navigations.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, ref signal)) = *self.state.cancel_at.lock() {
            if n == at {
                signal.cancel();
            }
        }

        self.url = url.to_string();
        self.state.visited.lock().push(url.to_string());

        let page = decode(url, 3);
        if let Some(message) = alert_argument(&page) {
            if let Some(ref tx) = self.sender {
                self.state.dialogs.fetch_add(1, Ordering::SeqCst);
                tx.notify(Dialog {
                    kind: DialogKind::Alert,
                    message,
                });
            }
        }
        Ok(())
    }

    fn accept_dialog(&mut self) -> Result<()> {
        Ok(())
    }

    fn disarm(&mut self) {
        self.sender = None;
    }

    fn reset(&mut self) -> Result<()> {
        self.state.resets.fetch_add(1, Ordering::SeqCst);
        self.url = BLANK_PAGE.to_string();
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn is_alive(&self) -> bool {
        !self.state.dead.load(Ordering::SeqCst)
    }
}

fn alert_argument(page: &str) -> Option<String> {
    let start = page.find("<script>alert(")? + "<script>alert(".len();
    let len = page[start..].find(")</script>")?;
    Some(page[start..start + len].to_string())
}

pub struct FakeLauncher(pub Arc<BrowserState>);

impl BrowserLauncher for FakeLauncher {
    fn launch(&self, _id: usize) -> Result<Box<dyn BrowserSession>> {
        self.0.launched.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.0),
            url: BLANK_PAGE.to_string(),
            sender: None,
        }))
    }
}

/// Server echoing the `q` parameter of `/search` into the page
pub async fn reflecting_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(|req: &Request| {
            let q = req
                .url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body><div>Results for {}</div></body></html>", q))
        })
        .mount(&server)
        .await;
    server
}

/// Server echoing `q` with `<script>` tags stripped
pub async fn sanitizing_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(|req: &Request| {
            let q = req
                .url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            let cleaned = q.replace("<script>", "").replace("</script>", "");
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body><div>Results for {}</div></body></html>", cleaned))
        })
        .mount(&server)
        .await;
    server
}
