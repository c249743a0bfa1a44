//! Gates the interactive session on the inference service being reachable.
//!
//! Every tick launches an independent probe. The first probe to see success
//! fires the [`ReadinessSignal`]; the coordinator then stops its timer and
//! returns. Probes still in flight are left to finish and their results are
//! ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::remote::HealthProbe;

/// One-shot "dependency is reachable" event. Only the first [`fire`] counts.
///
/// [`fire`]: ReadinessSignal::fire
#[derive(Debug)]
pub struct ReadinessSignal {
    fired: AtomicBool,
    tx: mpsc::Sender<()>,
}

impl ReadinessSignal {
    pub fn new() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { fired: AtomicBool::new(false), tx }, rx)
    }

    /// Returns `true` for the one caller whose event is delivered.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Capacity 1 and a single sender that gets past the flag, so this
        // can only fail if the receiver is gone.
        let _ = self.tx.try_send(());
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// Outcome of waiting for the service.
#[derive(Debug, Clone, Copy)]
pub struct Ready {
    pub probes_launched: u64,
    pub waited: Duration,
}

pub struct ReadinessCoordinator<P> {
    probe: Arc<P>,
    interval: Duration,
}

impl<P> ReadinessCoordinator<P>
where
    P: HealthProbe + Send + Sync + 'static,
{
    pub fn new(probe: P, interval: Duration) -> Self {
        Self { probe: Arc::new(probe), interval }
    }

    /// Probes every `interval` until one probe succeeds.
    ///
    /// Never gives up; the first probe is sent one interval after the call.
    pub async fn wait_until_ready(self) -> Ready {
        let started = Instant::now();
        let (signal, mut ready) = ReadinessSignal::new();
        let signal = Arc::new(signal);

        let mut ticker = time::interval_at(started + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut launched = 0u64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    launched += 1;
                    let probe = self.probe.clone();
                    let signal = signal.clone();
                    tokio::spawn(async move {
                        if probe.probe().await && signal.fire() {
                            tracing::debug!(probe = launched, "Readiness probe succeeded first");
                        }
                    });
                    tracing::debug!(probe = launched, "Readiness probe launched");
                }
                Some(()) = ready.recv() => break,
            }
        }
        drop(ticker);

        let waited = started.elapsed();
        tracing::info!(probes = launched, ?waited, "Inference service is ready");
        Ready { probes_launched: launched, waited }
    }
}
