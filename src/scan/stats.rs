// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::xss::{ConfirmationResult, ReflectionResult};

/// Run-scoped counters, updated concurrently by probe and confirm tasks
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Candidates generated
    candidates: AtomicU64,
    /// Probes that returned a result, abandoned ones included
    probed: AtomicU64,
    /// Reflected candidates
    reflected: AtomicU64,
    /// Probed, payload absent
    not_reflected: AtomicU64,
    /// Probes that failed on the network
    network_errors: AtomicU64,
    /// Probes skipped after cancellation
    abandoned: AtomicU64,
    /// Confirmations run
    confirmations: AtomicU64,
    /// Confirmed exploitable
    exploitable: AtomicU64,
    /// Reflected but no dialog
    not_exploitable: AtomicU64,
    /// Reflected candidates dropped after cancellation, unconfirmed
    discarded: AtomicU64,
    /// Reflected candidates skipped because an equivalent finding exists
    covered: AtomicU64,
}

/// Point-in-time copy of [`ScanStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub candidates: u64,
    pub probed: u64,
    pub reflected: u64,
    pub not_reflected: u64,
    pub network_errors: u64,
    pub abandoned: u64,
    pub confirmations: u64,
    pub exploitable: u64,
    pub not_exploitable: u64,
    pub discarded: u64,
    pub covered: u64,
}

impl StatsSnapshot {
    /// Candidates proven not vulnerable. Network errors and abandoned
    /// probes were never tested and are excluded.
    pub fn not_vulnerable(&self) -> u64 {
        self.not_reflected + self.not_exploitable
    }

    /// Candidates that could not be tested
    pub fn untested(&self) -> u64 {
        self.network_errors + self.abandoned + self.discarded
    }
}

impl ScanStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate total
    pub fn set_candidates(&self, count: u64) {
        self.candidates.store(count, Ordering::Relaxed);
    }

    /// Count a probe result
    pub fn record_probe(&self, result: &ReflectionResult) {
        self.probed.fetch_add(1, Ordering::Relaxed);
        let counter = match result {
            ReflectionResult::Reflected => &self.reflected,
            ReflectionResult::NotReflected => &self.not_reflected,
            r if r.is_abandoned() => &self.abandoned,
            ReflectionResult::NetworkError(_) => &self.network_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a confirmation result
    pub fn record_confirmation(&self, result: &ConfirmationResult) {
        self.confirmations.fetch_add(1, Ordering::Relaxed);
        if result.exploitable {
            self.exploitable.fetch_add(1, Ordering::Relaxed);
        } else {
            self.not_exploitable.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count a reflected candidate that was never confirmed
    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a reflected candidate skipped because its finding is known
    pub fn record_covered(&self) {
        self.covered.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            candidates: self.candidates.load(Ordering::Relaxed),
            probed: self.probed.load(Ordering::Relaxed),
            reflected: self.reflected.load(Ordering::Relaxed),
            not_reflected: self.not_reflected.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            confirmations: self.confirmations.load(Ordering::Relaxed),
            exploitable: self.exploitable.load(Ordering::Relaxed),
            not_exploitable: self.not_exploitable.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            covered: self.covered.load(Ordering::Relaxed),
        }
    }
}
