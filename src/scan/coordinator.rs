// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Two-stage scan pipeline
//!
//! Probes run at HTTP concurrency; reflected candidates flow through a
//! bounded channel to confirmation tasks bounded by the browser pool.

use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::ScanConfig;
use super::context::ScanContext;
use super::stats::StatsSnapshot;
use crate::browser::{BrowserPool, PoolStats};
use crate::error::Result;
use crate::http::HttpClient;
use crate::xss::{Candidate, ConfirmationEngine, Finding, ReflectionProber, VariationGenerator};

/// Outcome of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Targets scanned
    pub targets: usize,
    /// Distinct payloads
    pub payloads: usize,
    /// Counters
    pub stats: StatsSnapshot,
    /// Findings in completion order
    pub findings: Vec<Finding>,
    /// Wall time in seconds
    pub elapsed_secs: f64,
    /// Run was cancelled before completion
    pub interrupted: bool,
    /// Browser pool counters
    pub pool: PoolStats,
}

impl ScanSummary {
    /// Confirmed vulnerable candidates
    pub fn vulnerable(&self) -> usize {
        self.findings.len()
    }

    /// Candidates proven not vulnerable
    pub fn not_vulnerable(&self) -> u64 {
        self.stats.not_vulnerable()
    }
}

/// Runs the reflection and confirmation stages over a candidate set.
///
/// The pool is shut down at the end of [`ScanCoordinator::run`], so a
/// coordinator drives a single run.
pub struct ScanCoordinator {
    config: ScanConfig,
    prober: ReflectionProber,
    engine: ConfirmationEngine,
    pool: Arc<BrowserPool>,
}

impl ScanCoordinator {
    /// Create a coordinator confirming on `pool`
    pub fn new(config: ScanConfig, pool: Arc<BrowserPool>) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(config.http_client_config())?;

        Ok(Self {
            prober: ReflectionProber::new(client),
            engine: ConfirmationEngine::new(config.dialog_timeout),
            pool,
            config,
        })
    }

    /// Create a coordinator with a headless Chrome pool
    pub fn with_chrome(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let pool = BrowserPool::chrome(config.browser_workers, config.browser_config())?;
        Self::new(config, pool)
    }

    /// Get config
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Get the browser pool
    pub fn pool(&self) -> &Arc<BrowserPool> {
        &self.pool
    }

    /// Scan every target with every payload.
    ///
    /// Raising the context's cancel signal stops dispatch; in-flight probes
    /// and confirmations finish and the findings so far are returned.
    pub async fn run(
        &self,
        targets: &[String],
        payloads: &[String],
        context: &ScanContext,
    ) -> Result<ScanSummary> {
        if let Err(e) = self.pool.warm_up().await {
            self.pool.shutdown().await;
            return Err(e);
        }

        let generator = VariationGenerator::new(self.config.encoding_rounds);
        let candidates = generator.generate_all(targets, payloads);
        context.stats().set_candidates(candidates.len() as u64);

        info!(
            "Testing {} candidates ({} targets x {} payloads) with {} probes and {} browsers",
            candidates.len(),
            targets.len(),
            payloads.len(),
            self.config.http_concurrency,
            self.pool.capacity()
        );

        let (tx, rx) = mpsc::channel::<Candidate>(self.pool.capacity() * 2);

        let probe_stage = self.probe_stage(candidates, tx, context);
        let confirm_stage = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|candidate| (candidate, rx))
        })
        .map(|candidate| self.confirm_one(candidate, context))
        .buffer_unordered(self.pool.capacity())
        .for_each(|_| future::ready(()));

        tokio::join!(probe_stage, confirm_stage);

        let interrupted = context.is_cancelled();
        if interrupted {
            info!("Scan interrupted, shutting down");
        }

        self.pool.shutdown().await;
        if let Err(e) = context.close_sink() {
            warn!("Failed to close findings file: {}", e);
        }

        let summary = ScanSummary {
            targets: targets.len(),
            payloads: payloads.len(),
            stats: context.stats().snapshot(),
            findings: context.findings(),
            elapsed_secs: context.elapsed().as_secs_f64(),
            interrupted,
            pool: self.pool.stats(),
        };

        info!(
            "Scan finished in {:.2}s: {} vulnerable, {} not vulnerable, {} untested",
            summary.elapsed_secs,
            summary.vulnerable(),
            summary.not_vulnerable(),
            summary.stats.untested()
        );

        Ok(summary)
    }

    /// Probe every candidate and forward the reflected ones.
    /// Dropping `tx` at the end closes the confirmation stage.
    async fn probe_stage(
        &self,
        candidates: Vec<Candidate>,
        tx: mpsc::Sender<Candidate>,
        context: &ScanContext,
    ) {
        let cancel = context.cancel_signal();

        stream::iter(candidates)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|candidate| async move {
                let result = self.prober.probe(&candidate, cancel).await;
                context.stats().record_probe(&result);
                (candidate, result)
            })
            .buffer_unordered(self.config.http_concurrency)
            .filter_map(|(candidate, result)| {
                future::ready(result.is_reflected().then_some(candidate))
            })
            .for_each(|candidate| {
                let tx = tx.clone();
                async move {
                    debug!("Queueing {} for confirmation", candidate.url);
                    if tx.send(candidate).await.is_err() {
                        context.stats().record_discarded();
                    }
                }
            })
            .await;
    }

    async fn confirm_one(&self, candidate: Candidate, context: &ScanContext) {
        if context.is_cancelled() {
            context.stats().record_discarded();
            return;
        }
        if context.is_covered(&candidate) {
            debug!("Finding already recorded, skipping {}", candidate.url);
            context.stats().record_covered();
            return;
        }

        let mut lease = match self.pool.acquire().await {
            Ok(lease) => lease,
            Err(e) if e.is_pool_closed() => {
                debug!("Pool closed, dropping {}", candidate.url);
                context.stats().record_discarded();
                return;
            }
            Err(e) => {
                warn!("No browser for {}: {}", candidate.url, e);
                context.stats().record_discarded();
                return;
            }
        };

        if context.is_cancelled() {
            context.stats().record_discarded();
            self.pool.release(lease).await;
            return;
        }

        let result = self
            .engine
            .confirm(&mut lease, &candidate, self.config.dialog_timeout)
            .await;
        self.pool.release(lease).await;
        context.stats().record_confirmation(&result);

        if result.exploitable {
            context.record(Finding::new(&candidate, &result));
        } else {
            debug!("Not exploitable ({:?}): {}", result.outcome, candidate.url);
        }
    }
}
