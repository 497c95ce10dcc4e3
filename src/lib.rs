// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # LazyXSS - Reflected XSS Discovery
//!
//! Finds reflected XSS in two stages: a cheap, highly parallel HTTP
//! reflection filter, then confirmation in real headless Chrome by watching
//! for JavaScript dialogs.
//!
//! ## Features
//!
//! - Payload injection into every query parameter, plus appended to the URL
//! - Repeated percent-encoding of payloads for filter evasion
//! - Decode-then-compare reflection checks with retry and backoff
//! - Bounded pool of isolated headless Chrome browsers
//! - Dialog interception armed before navigation
//! - Cooperative cancellation with findings flushed as they are confirmed
//! - Paginated HTML report and JSON summary
//!
//! ## Example
//!
//! ```rust,no_run
//! use lazyxss::{CancelSignal, ScanConfig, ScanContext, ScanCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::default().encoding_rounds(1);
//!     let coordinator = ScanCoordinator::with_chrome(config)?;
//!     let context = ScanContext::new(CancelSignal::new());
//!
//!     let targets = vec!["https://example.com/search?q=test".to_string()];
//!     let payloads = vec!["\"><svg onload=alert(1)>".to_string()];
//!
//!     let summary = coordinator.run(&targets, &payloads, &context).await?;
//!     for finding in &summary.findings {
//!         println!("XSS confirmed: {}", finding);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod error;
pub mod http;
pub mod payload;
pub mod report;
pub mod scan;
pub mod xss;

// Re-exports for convenience

// Browser
pub use browser::{BrowserConfig, BrowserLauncher, BrowserSession, ChromeLauncher, DialogWatch};

// Browser Pool
pub use browser::{BrowserPool, PoolStats, PooledBrowser};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{HttpClient, HttpClientConfig, Response};

// Payloads
pub use payload::{decode, encode, load_payloads, load_targets};

// Reports
pub use report::{ReportFormat, ReportWriter};

// Scan
pub use scan::{CancelSignal, FindingSink, ScanConfig, ScanContext, ScanCoordinator, ScanSummary};

// XSS
pub use xss::{Candidate, Dialog, DialogKind, Finding, InjectionPoint};
pub use xss::{ConfirmationEngine, ConfirmationOutcome, ConfirmationResult};
pub use xss::{NetworkFault, ReflectionProber, ReflectionResult, VariationGenerator};

/// LazyXSS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
