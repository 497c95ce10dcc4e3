// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Real-browser confirmation backend
//!
//! A pool of headless Chrome processes, each with its own profile, driven
//! through a small synchronous session interface.

mod chrome;
mod config;
mod pool;
mod session;

pub use chrome::{ChromeLauncher, ChromeSession};
pub use config::BrowserConfig;
pub use pool::{BrowserHandle, BrowserPool, PoolStats, PooledBrowser};
pub use session::{BrowserLauncher, BrowserSession, DialogSender, DialogWatch, BLANK_PAGE};
