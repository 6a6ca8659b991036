//! Sweep scheduler.
//!
//! Owns the timer that drives automatic sweeps and exposes the manual
//! trigger. The engine's sweep gate is shared by both paths, so a manual
//! "check now" racing the timer can never start a second concurrent
//! sweep.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use caseflow_core::{Error, Result, SchedulerConfig};

use crate::engine::{EscalationEngine, SweepSummary};

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, never started.
    Idle,
    /// Sweep loop running.
    Running,
    /// Stopped; `start` may be called again.
    Stopped,
}

/// Drives periodic sweeps: one delayed initial sweep as a grace period
/// for the store, then a fixed-period loop. The next tick is scheduled
/// relative to sweep completion, so a long sweep delays the following
/// one instead of piling up.
pub struct SweepScheduler {
    engine: Arc<EscalationEngine>,
    config: SchedulerConfig,
    state: Arc<RwLock<SchedulerState>>,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SweepScheduler {
    pub fn new(engine: Arc<EscalationEngine>, config: SchedulerConfig) -> Self {
        Self {
            engine,
            config,
            state: Arc::new(RwLock::new(SchedulerState::Idle)),
            stop_tx: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    pub async fn state(&self) -> SchedulerState {
        *self.state.read().await
    }

    /// Start the sweep loop. No-op if already running.
    pub async fn start(&self) {
        let mut state = self.state.write().await;
        if *state == SchedulerState::Running {
            return;
        }
        *state = SchedulerState::Running;
        drop(state);

        let (tx, mut rx) = watch::channel(false);
        let engine = self.engine.clone();
        let initial_delay = self.config.initial_delay;
        let sweep_interval = self.config.sweep_interval;

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(initial_delay) => {}
                _ = rx.changed() => {
                    tracing::info!("Sweep scheduler stopped before first sweep");
                    return;
                }
            }

            loop {
                match engine.run_sweep(Utc::now()).await {
                    Ok(summary) => {
                        tracing::info!(
                            processed = summary.processed,
                            escalated = summary.escalated,
                            "Scheduled sweep finished"
                        );
                    }
                    Err(Error::SweepInProgress) => {
                        // A manual trigger beat this tick to the gate.
                        tracing::debug!("Sweep already in flight, tick skipped");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Scheduled sweep failed, retrying next tick");
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(sweep_interval) => {}
                    _ = rx.changed() => {
                        tracing::info!("Sweep scheduler stopped");
                        break;
                    }
                }
            }
        });

        *self.stop_tx.lock().await = Some(tx);
        *self.handle.lock().await = Some(handle);

        tracing::info!(
            initial_delay_secs = initial_delay.as_secs(),
            sweep_interval_secs = sweep_interval.as_secs(),
            "Sweep scheduler started"
        );
    }

    /// Run a sweep immediately, sharing the single-flight gate with the
    /// timer path. Returns [`Error::SweepInProgress`] if a sweep is
    /// already in flight.
    pub async fn trigger_now(&self) -> Result<SweepSummary> {
        tracing::info!("Manual sweep triggered");
        self.engine.run_sweep(Utc::now()).await
    }

    /// Stop the loop. The pending timer is cancelled; an in-flight sweep
    /// finishes first. The scheduler can be started again afterwards.
    pub async fn stop(&self) {
        if let Some(tx) = self.stop_tx.lock().await.take() {
            let _ = tx.send(true);
        }
        if let Some(handle) = self.handle.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Sweep loop ended abnormally");
            }
        }
        *self.state.write().await = SchedulerState::Stopped;
    }
}
