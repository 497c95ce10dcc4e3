// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser pool for confirmation workers
//!
//! A fixed number of browser sessions handed out one worker at a time.
//! Sessions are reset to a blank page on release, health-checked on acquire,
//! and replaced when their process died.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use super::chrome::ChromeLauncher;
use super::config::BrowserConfig;
use super::session::{BrowserLauncher, BrowserSession};
use crate::error::{Error, Result};

/// One live browser owned by the pool
pub struct BrowserHandle {
    id: usize,
    session: Box<dyn BrowserSession>,
    /// Checked in without a reset
    dirty: bool,
    uses: u64,
}

impl BrowserHandle {
    /// Handle id within the pool
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of times this handle was checked out
    pub fn uses(&self) -> u64 {
        self.uses
    }

    /// Get the session
    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Get the session mutably; the handle then needs a reset before reuse
    pub fn session_mut(&mut self) -> &mut dyn BrowserSession {
        self.dirty = true;
        self.session.as_mut()
    }

    /// Check if the handle may not be on a blank page
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the session to a blank page
    pub fn reset(&mut self) -> Result<()> {
        self.session.reset()?;
        self.dirty = false;
        Ok(())
    }
}

impl std::fmt::Debug for BrowserHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserHandle")
            .field("id", &self.id)
            .field("dirty", &self.dirty)
            .field("uses", &self.uses)
            .finish()
    }
}

/// Pool statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolStats {
    /// Browsers launched, including replacements
    pub launched: u64,
    /// Browsers replaced after dying or failing a reset
    pub replaced: u64,
    /// Browsers torn down
    pub destroyed: u64,
    /// Successful acquisitions
    pub acquisitions: u64,
    /// Handles currently checked out
    pub in_use: u64,
    /// Peak concurrent checkouts
    pub peak_in_use: u64,
    /// Total wait time for a free slot (ms)
    pub total_wait_ms: u64,
}

/// A browser checked out of the pool.
///
/// Return it with [`BrowserPool::release`]. A lease dropped without release
/// (panic, abort) still returns the handle, marked for reset on next acquire.
pub struct PooledBrowser {
    handle: Option<BrowserHandle>,
    pool: Arc<BrowserPool>,
    _permit: OwnedSemaphorePermit,
}

impl PooledBrowser {
    /// Id of the held handle
    pub fn id(&self) -> Option<usize> {
        self.handle.as_ref().map(|h| h.id)
    }

    /// Get the held handle
    pub fn handle(&self) -> Option<&BrowserHandle> {
        self.handle.as_ref()
    }

    /// Move the handle out, e.g. into a blocking task
    pub fn take_handle(&mut self) -> Option<BrowserHandle> {
        self.handle.take()
    }

    /// Put a handle taken with [`PooledBrowser::take_handle`] back
    pub fn restore_handle(&mut self, handle: BrowserHandle) {
        self.handle = Some(handle);
    }

    /// Return this lease to its pool
    pub async fn release(self) {
        let pool = Arc::clone(&self.pool);
        pool.release(self).await;
    }
}

impl Drop for PooledBrowser {
    fn drop(&mut self) {
        self.pool.end_checkout();
        if let Some(mut handle) = self.handle.take() {
            debug!("Browser #{} returned without release", handle.id);
            handle.dirty = true;
            self.pool.checkin(handle);
        }
    }
}

/// Fixed-capacity browser pool
pub struct BrowserPool {
    launcher: Arc<dyn BrowserLauncher>,
    capacity: usize,
    /// Handles ready for checkout
    idle: Mutex<Vec<BrowserHandle>>,
    /// One permit per handle
    semaphore: Arc<Semaphore>,
    next_id: AtomicUsize,
    closed: AtomicBool,
    stats: RwLock<PoolStats>,
}

impl BrowserPool {
    /// Create a pool of `capacity` sessions built by `launcher`.
    ///
    /// Sessions are launched lazily; call [`BrowserPool::warm_up`] to launch
    /// them up front.
    pub fn new(capacity: usize, launcher: impl BrowserLauncher) -> Result<Arc<Self>> {
        if capacity == 0 {
            return Err(Error::config("Browser pool size must be at least 1"));
        }

        Ok(Arc::new(Self {
            launcher: Arc::new(launcher),
            capacity,
            idle: Mutex::new(Vec::with_capacity(capacity)),
            semaphore: Arc::new(Semaphore::new(capacity)),
            next_id: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            stats: RwLock::new(PoolStats::default()),
        }))
    }

    /// Create a pool of headless Chrome sessions
    pub fn chrome(capacity: usize, config: BrowserConfig) -> Result<Arc<Self>> {
        Self::new(capacity, ChromeLauncher::new(config))
    }

    /// Launch browsers until the pool is at capacity
    pub async fn warm_up(self: &Arc<Self>) -> Result<()> {
        let missing = self.capacity.saturating_sub(self.idle_count() + self.in_use());
        for _ in 0..missing {
            let handle = self.launch_handle().await?;
            self.checkin(handle);
        }
        info!("Browser pool ready with {} browsers", self.idle_count());
        Ok(())
    }

    /// Acquire a browser, waiting until one is free
    pub async fn acquire(self: &Arc<Self>) -> Result<PooledBrowser> {
        let start = Instant::now();

        if self.is_closed() {
            return Err(Error::PoolClosed);
        }

        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::PoolClosed)?;

        let waited_ms = start.elapsed().as_millis() as u64;

        let idle = self.idle.lock().pop();
        let mut handle = match idle {
            Some(handle) => self.prepare(handle).await?,
            None => self.launch_handle().await?,
        };
        handle.uses += 1;

        {
            let mut stats = self.stats.write();
            stats.total_wait_ms += waited_ms;
            stats.acquisitions += 1;
            stats.in_use += 1;
            if stats.in_use > stats.peak_in_use {
                stats.peak_in_use = stats.in_use;
            }
        }

        debug!(
            "Acquired browser #{} (use {}) after {}ms",
            handle.id, handle.uses, waited_ms
        );

        Ok(PooledBrowser {
            handle: Some(handle),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    /// Reset a lease's browser to a blank page and return it to the pool
    pub async fn release(&self, mut lease: PooledBrowser) {
        let Some(mut handle) = lease.take_handle() else {
            return;
        };

        if !handle.dirty {
            self.checkin(handle);
            return;
        }

        let reset = tokio::task::spawn_blocking(move || {
            let result = handle.reset();
            (handle, result)
        })
        .await;

        match reset {
            Ok((handle, Ok(()))) => self.checkin(handle),
            Ok((handle, Err(e))) => {
                warn!("Browser #{} failed to reset, discarding: {}", handle.id, e);
                self.destroy(handle);
            }
            Err(e) => {
                warn!("Browser reset task failed: {}", e);
                self.stats.write().destroyed += 1;
            }
        }
        // The permit is released with the lease, after the handle is back.
        drop(lease);
    }

    /// Terminate every idle browser and refuse further acquisitions.
    ///
    /// Idempotent. Handles still checked out are destroyed when returned.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.semaphore.close();

        let drained: Vec<BrowserHandle> = std::mem::take(&mut *self.idle.lock());
        let count = drained.len() as u64;
        if let Err(e) = tokio::task::spawn_blocking(move || drop(drained)).await {
            warn!("Browser teardown task failed: {}", e);
        }
        self.stats.write().destroyed += count;

        info!("Browser pool shut down ({} browsers closed)", count);
    }

    /// Make an idle handle safe to hand out: alive and on a blank page
    async fn prepare(&self, handle: BrowserHandle) -> Result<BrowserHandle> {
        let checked = tokio::task::spawn_blocking(move || {
            let mut handle = handle;
            let healthy =
                handle.session.is_alive() && (!handle.dirty || handle.reset().is_ok());
            (handle, healthy)
        })
        .await;

        match checked {
            Ok((handle, true)) => Ok(handle),
            Ok((handle, false)) => {
                warn!("Browser #{} is unresponsive, replacing it", handle.id);
                self.destroy(handle);
                self.stats.write().replaced += 1;
                self.launch_handle().await
            }
            Err(e) => {
                warn!("Browser health check failed: {}, replacing", e);
                self.stats.write().replaced += 1;
                self.launch_handle().await
            }
        }
    }

    async fn launch_handle(&self) -> Result<BrowserHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let launcher = Arc::clone(&self.launcher);

        let session = tokio::task::spawn_blocking(move || launcher.launch(id))
            .await
            .map_err(|e| Error::browser(format!("Browser launch task failed: {}", e)))??;

        self.stats.write().launched += 1;
        debug!("Launched browser #{}", id);

        Ok(BrowserHandle {
            id,
            session,
            dirty: false,
            uses: 0,
        })
    }

    fn checkin(&self, handle: BrowserHandle) {
        if self.is_closed() {
            self.destroy(handle);
        } else {
            self.idle.lock().push(handle);
        }
    }

    fn end_checkout(&self) {
        let mut stats = self.stats.write();
        stats.in_use = stats.in_use.saturating_sub(1);
    }

    fn destroy(&self, handle: BrowserHandle) {
        self.stats.write().destroyed += 1;
        debug!("Destroying browser #{}", handle.id);
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn_blocking(move || drop(handle));
            }
            Err(_) => drop(handle),
        }
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        self.stats.read().clone()
    }

    /// Get pool capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Handles ready for checkout
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Handles currently checked out
    pub fn in_use(&self) -> usize {
        self.stats.read().in_use as usize
    }

    /// Free checkout slots
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Check if the pool was shut down
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
