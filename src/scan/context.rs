// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Run-scoped shared state

use std::collections::HashSet;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::cancel::CancelSignal;
use super::sink::FindingSink;
use super::stats::ScanStats;
use crate::error::Result;
use crate::xss::{Candidate, Finding};

/// Identity of a finding: the same payload through the same parameter of
/// the same target is one vulnerability
type FindingKey = (String, Option<String>, String);

#[derive(Default)]
struct Ledger {
    findings: Vec<Finding>,
    keys: HashSet<FindingKey>,
    sink: Option<FindingSink>,
}

/// State shared by every task of one run: the cancellation signal, the
/// findings collection with its durable sink, and the counters.
pub struct ScanContext {
    cancel: CancelSignal,
    ledger: Mutex<Ledger>,
    stats: ScanStats,
    started: Instant,
}

impl ScanContext {
    /// Create a context that keeps findings in memory only
    pub fn new(cancel: CancelSignal) -> Self {
        Self {
            cancel,
            ledger: Mutex::new(Ledger::default()),
            stats: ScanStats::new(),
            started: Instant::now(),
        }
    }

    /// Create a context that also writes findings to `sink`
    pub fn with_sink(cancel: CancelSignal, sink: FindingSink) -> Self {
        let context = Self::new(cancel);
        context.ledger.lock().sink = Some(sink);
        context
    }

    /// Get the cancellation signal
    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    /// Check if the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Get counters
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Time since the run started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Check if a finding with the candidate's target, parameter and
    /// payload was already recorded
    pub fn is_covered(&self, candidate: &Candidate) -> bool {
        let key = (
            candidate.target.clone(),
            candidate.parameter(),
            candidate.payload.clone(),
        );
        self.ledger.lock().keys.contains(&key)
    }

    /// Append a finding and write it through to the sink.
    ///
    /// Findings completing after cancellation are dropped, as are repeats of
    /// an already recorded target, parameter and payload. Returns whether
    /// the finding was kept.
    pub fn record(&self, finding: Finding) -> bool {
        let mut ledger = self.ledger.lock();
        if self.cancel.is_cancelled() {
            return false;
        }

        let key = (
            finding.target.clone(),
            finding.parameter.clone(),
            finding.payload.clone(),
        );
        if !ledger.keys.insert(key) {
            debug!("Already recorded, skipping {}", finding.url);
            return false;
        }

        if let Some(ref mut sink) = ledger.sink {
            if let Err(e) = sink.write(&finding) {
                warn!("Failed to write finding to {}: {}", sink.path().display(), e);
            }
        }
        info!("XSS confirmed: {}", finding);
        ledger.findings.push(finding);
        true
    }

    /// Findings recorded so far, in completion order
    pub fn findings(&self) -> Vec<Finding> {
        self.ledger.lock().findings.clone()
    }

    /// Number of findings recorded
    pub fn finding_count(&self) -> usize {
        self.ledger.lock().findings.len()
    }

    /// Flush and close the sink. Idempotent.
    pub fn close_sink(&self) -> Result<()> {
        let sink = self.ledger.lock().sink.take();
        match sink {
            Some(sink) => sink.close(),
            None => Ok(()),
        }
    }
}
