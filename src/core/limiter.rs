//! Runtime and record limits.
//!
//! Elapsed runtime is advanced by a detached timer thread, independent of the
//! poll loop; processed records are counted by the loop itself.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Seconds
    pub max_runtime: Option<u64>,
    pub max_records: Option<u64>,
}

impl Limits {
    pub fn is_unbounded(&self) -> bool {
        self.max_runtime.is_none() && self.max_records.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitReached {
    Runtime(u64),
    Records(u64),
}

impl fmt::Display for LimitReached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitReached::Runtime(max) => write!(f, "max runtime limit reached at {max}"),
            LimitReached::Records(max) => write!(f, "max records limit reached at {max}"),
        }
    }
}

/// Process-scoped counters. Both start at zero and only grow.
#[derive(Debug, Default)]
pub struct RunCounters {
    elapsed_ms: AtomicU64,
    processed_records: AtomicU64,
}

impl RunCounters {
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ms.load(Ordering::Relaxed) / 1000
    }

    pub fn processed_records(&self) -> u64 {
        self.processed_records.load(Ordering::Relaxed)
    }

    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn record_processed(&self) -> u64 {
        self.processed_records.fetch_add(1, Ordering::Relaxed) + 1
    }
}

pub struct RuntimeLimiter {
    limits: Limits,
    counters: Arc<RunCounters>,
}

impl RuntimeLimiter {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            counters: Arc::new(RunCounters::default()),
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn counters(&self) -> &Arc<RunCounters> {
        &self.counters
    }

    /// Spawn the elapsed-runtime timer, only when a runtime limit is set.
    ///
    /// The thread sleeps `period`, adds it to the counter and repeats forever.
    /// It is never joined; it dies with the process.
    pub fn start_ticker(&self, period: Duration) -> std::io::Result<Option<JoinHandle<()>>> {
        if self.limits.max_runtime.is_none() {
            return Ok(None);
        }

        let counters = Arc::clone(&self.counters);
        debug!(period_ms = period.as_millis() as u64, "limiter: starting runtime ticker");

        let handle = thread::Builder::new()
            .name("runtime-ticker".into())
            .spawn(move || {
                loop {
                    thread::sleep(period);
                    counters.advance(period);
                }
            })?;

        Ok(Some(handle))
    }

    pub fn record_processed(&self) -> u64 {
        self.counters.record_processed()
    }

    /// Which limit, if any, has been reached.
    pub fn reached(&self) -> Option<LimitReached> {
        if let Some(max) = self.limits.max_runtime
            && self.counters.elapsed_seconds() >= max
        {
            return Some(LimitReached::Runtime(max));
        }
        if let Some(max) = self.limits.max_records
            && self.counters.processed_records() >= max
        {
            return Some(LimitReached::Records(max));
        }
        None
    }
}
