use std::sync::Arc;
use std::time::Duration;

use basket_common::Clock;

use crate::ledger::ActivityLedger;
use crate::metrics::{emit_counter, names, MetricsSink, Tags};

pub struct AbandonmentMonitor {
    ledger: ActivityLedger,
    sink: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock>,
    threshold: Duration,
}

impl AbandonmentMonitor {
    pub fn new(
        ledger: ActivityLedger,
        sink: Arc<dyn MetricsSink>,
        clock: Arc<dyn Clock>,
        threshold: Duration,
    ) -> Self {
        Self {
            ledger,
            sink,
            clock,
            threshold,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// One scan of the ledger. Returns the users flagged as abandoned.
    pub fn sweep(&self) -> Vec<String> {
        let now_ms = self.clock.now_ms();
        let candidates = self.ledger.snapshot_inactive_users(self.threshold, now_ms);

        let mut abandoned = Vec::with_capacity(candidates.len());
        for user_id in candidates {
            // The user may have come back since the snapshot was taken.
            if !self.ledger.forget_if_inactive(&user_id, self.threshold, now_ms) {
                continue;
            }
            emit_counter(self.sink.as_ref(), names::ABANDONED_CARTS_TOTAL, 1, &Tags::new());
            tracing::info!(user_id = %user_id, "cart abandoned");
            abandoned.push(user_id);
        }

        tracing::debug!(
            abandoned = abandoned.len(),
            tracked = self.ledger.tracked_users(),
            "abandonment sweep finished"
        );
        abandoned
    }
}
