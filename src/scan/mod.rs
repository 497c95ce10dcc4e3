// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan orchestration
//!
//! Provides:
//! - Scan configuration and validation
//! - Cooperative cancellation shared by every task of a run
//! - The findings collection and its durable file sink
//! - The coordinator running reflection probes and browser confirmations

mod cancel;
mod config;
mod context;
mod coordinator;
mod sink;
mod stats;

pub use cancel::CancelSignal;
pub use config::{ScanConfig, DEFAULT_OUTPUT};
pub use context::ScanContext;
pub use coordinator::{ScanCoordinator, ScanSummary};
pub use sink::FindingSink;
pub use stats::{ScanStats, StatsSnapshot};
