use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::abandonment::AbandonmentMonitor;

/// Longest sweep period the loop accepts. Longer periods are clamped.
pub const MAX_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

pub struct MonitorTask {
    pub period: Duration,
    pub monitor: AbandonmentMonitor,
}

/// Owns the running sweep loop. Dropping the handle stops the loop at
/// its next suspension point.
pub struct MonitorHandle {
    handle: JoinHandle<()>,
    stop_tx: Option<oneshot::Sender<()>>,
    trigger_tx: mpsc::Sender<oneshot::Sender<usize>>,
}

impl MonitorHandle {
    /// Runs a sweep now and waits for it. Returns the number of carts
    /// flagged, or `None` if the loop is gone.
    pub async fn tick_now(&self) -> Option<usize> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.trigger_tx.send(reply_tx).await.ok()?;
        reply_rx.await.ok()
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            if !e.is_cancelled() {
                tracing::error!(error = %e, "abandonment monitor panicked");
            }
        }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl MonitorTask {
    pub fn spawn(self) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<oneshot::Sender<usize>>(8);

        let period = if self.period > MAX_PERIOD {
            tracing::warn!(
                requested_s = self.period.as_secs(),
                max_s = MAX_PERIOD.as_secs(),
                "sweep period clamped"
            );
            MAX_PERIOD
        } else {
            self.period
        };

        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                period_s = period.as_secs(),
                threshold_s = self.monitor.threshold().as_secs(),
                "abandonment monitor started"
            );

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        self.monitor.sweep();
                    }
                    Some(reply) = trigger_rx.recv() => {
                        let flagged = self.monitor.sweep().len();
                        let _ = reply.send(flagged);
                    }
                }
            }

            tracing::info!("abandonment monitor stopped");
        });

        MonitorHandle {
            handle,
            stop_tx: Some(stop_tx),
            trigger_tx,
        }
    }
}
