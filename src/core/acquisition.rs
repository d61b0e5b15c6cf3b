//! Acquisition loop: INITIALIZING → RUNNING → CLOSING → TERMINATED.
//!
//! The receiver is polled on every iteration with no delay of our own (its
//! read timeout provides the pacing). Fix state is evaluated once per
//! `tick_interval` of wall-clock time, and every exit path closes the session
//! exactly once.

use crate::config::Settings;
use crate::core::fix_tracker::FixTracker;
use crate::core::limiter::{LimitReached, Limits, RuntimeLimiter};
use crate::errors::AppResult;
use crate::gps::GpsReceiver;
use crate::models::LifecycleEvent;
use crate::sink::Sink;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Closing,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Graceful stop on a configured limit
    LimitReached,
    /// Operator asked us to stop (SIGINT/SIGTERM)
    Interrupted,
    /// Store, transport or initialization failure
    Failed,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::LimitReached => 0,
            ExitStatus::Interrupted => 130,
            ExitStatus::Failed => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    pub limits: Limits,
    pub tick_interval: Duration,
    pub runtime_tick: Duration,
}

impl From<&Settings> for LoopOptions {
    fn from(s: &Settings) -> Self {
        Self {
            limits: s.limits,
            tick_interval: s.tick_interval,
            runtime_tick: s.runtime_tick,
        }
    }
}

/// Log then forward one lifecycle event.
fn emit<S: Sink>(sink: &mut S, event: LifecycleEvent) -> AppResult<()> {
    if event.is_noisy() {
        debug!(event = %event, "process");
    } else {
        info!(event = %event, "process");
    }
    sink.emit_event(event)
}

/// CLOSING: write SESSION_END (best effort) and release the sink.
fn shutdown<S: Sink>(sink: &mut S, status: ExitStatus) -> ExitStatus {
    let mut status = status;

    if let Err(e) = emit(sink, LifecycleEvent::SessionEnd) {
        error!(error = %e, "process: failed to close session");
        status = ExitStatus::Failed;
    }
    if let Err(e) = sink.finish() {
        error!(error = %e, "process: failed to release output");
        status = ExitStatus::Failed;
    }

    match status {
        ExitStatus::LimitReached => warn!(status = status.code(), "process: exited"),
        _ => error!(status = status.code(), "process: exited"),
    }
    status
}

/// Run the whole lifecycle on an already opened sink.
///
/// `open_receiver` is called after SESSION_INITIALIZE; if it fails the
/// session is closed and the run ends with `Failed`.
pub fn start<S, R, F>(
    options: &LoopOptions,
    mut sink: S,
    open_receiver: F,
    interrupt: Arc<AtomicBool>,
) -> ExitStatus
where
    S: Sink,
    R: GpsReceiver,
    F: FnOnce() -> AppResult<R>,
{
    debug!(state = ?LoopState::Initializing, "process: initializing");
    debug!(
        max_records = ?options.limits.max_records,
        max_runtime = ?options.limits.max_runtime,
        "settings"
    );

    if let Err(e) = emit(&mut sink, LifecycleEvent::SessionInitialize) {
        error!(error = %e, "process: initialization failed");
        return shutdown(&mut sink, ExitStatus::Failed);
    }

    let mut receiver = match open_receiver() {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "serial");
            return shutdown(&mut sink, ExitStatus::Failed);
        }
    };

    if let Err(e) = receiver.configure() {
        error!(error = %e, "serial: failed to configure receiver");
        return shutdown(&mut sink, ExitStatus::Failed);
    }

    let limiter = RuntimeLimiter::new(options.limits);
    if let Err(e) = limiter.start_ticker(options.runtime_tick) {
        error!(error = %e, "limiter: failed to start runtime ticker");
        return shutdown(&mut sink, ExitStatus::Failed);
    }

    AcquisitionLoop::new(receiver, sink, limiter, options.tick_interval, interrupt).run()
}

pub struct AcquisitionLoop<R: GpsReceiver, S: Sink> {
    receiver: R,
    sink: S,
    tracker: FixTracker,
    limiter: RuntimeLimiter,
    tick_interval: Duration,
    interrupt: Arc<AtomicBool>,
    state: LoopState,
}

impl<R: GpsReceiver, S: Sink> AcquisitionLoop<R, S> {
    pub fn new(
        receiver: R,
        sink: S,
        limiter: RuntimeLimiter,
        tick_interval: Duration,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            receiver,
            sink,
            tracker: FixTracker::new(),
            limiter,
            tick_interval,
            interrupt,
            state: LoopState::Initializing,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn limiter(&self) -> &RuntimeLimiter {
        &self.limiter
    }

    fn transition(&mut self, to: LoopState) {
        debug!(from = ?self.state, to = ?to, "process: state");
        self.state = to;
    }

    /// RUNNING until a limit, an interrupt or an error; then CLOSING.
    pub fn run(mut self) -> ExitStatus {
        self.transition(LoopState::Running);

        if let Err(e) = emit(&mut self.sink, LifecycleEvent::SessionStart) {
            error!(error = %e, "process: failed to start session");
            return self.close(ExitStatus::Failed);
        }

        debug!("process: entering main processing loop");
        let mut last_tick = Instant::now();

        loop {
            if self.interrupt.load(Ordering::Relaxed) {
                warn!("process: interrupted");
                return self.close(ExitStatus::Interrupted);
            }

            if let Err(e) = self.receiver.update() {
                error!(error = %e, "serial");
                return self.close(ExitStatus::Failed);
            }

            let now = Instant::now();
            if now.duration_since(last_tick) < self.tick_interval {
                continue;
            }
            last_tick = now;

            match self.tick() {
                Ok(Some(limit)) => {
                    warn!("process: {limit}");
                    return self.close(ExitStatus::LimitReached);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "database");
                    return self.close(ExitStatus::Failed);
                }
            }
        }
    }

    /// One evaluation of the fix state against the latest snapshot.
    pub fn tick(&mut self) -> AppResult<Option<LimitReached>> {
        let fix = self.receiver.snapshot();
        let outcome = self.tracker.observe(fix.has_fix);

        if let Some(event) = outcome.event {
            emit(&mut self.sink, event)?;
        }

        if outcome.record_eligible {
            self.sink.emit_record(fix)?;
            let total = self.limiter.record_processed();
            debug!(record = total, "database");
        }

        Ok(self.limiter.reached())
    }

    fn close(mut self, status: ExitStatus) -> ExitStatus {
        self.transition(LoopState::Closing);
        let status = shutdown(&mut self.sink, status);
        self.transition(LoopState::Terminated);
        status
    }
}
