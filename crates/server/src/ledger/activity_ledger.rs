use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::sync::Arc;
use std::time::Duration;

use basket_common::ProductId;

/// Process-wide cart lifecycle state shared by request handlers and the
/// abandonment monitor. Clones share the same maps. Nothing here is
/// persisted; a restart starts from an empty ledger.
#[derive(Clone, Default)]
pub struct ActivityLedger {
    first_added_at: Arc<DashMap<ProductId, i64>>,
    last_update_at: Arc<DashMap<String, i64>>,
    checked_out: Arc<DashSet<String>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_activity(&self, user_id: &str, now_ms: i64) {
        self.last_update_at.insert(user_id.to_string(), now_ms);
    }

    /// Returns `true` when the product was not yet tracked. An already
    /// active product keeps its original timestamp.
    pub fn mark_product_active(&self, product_id: ProductId, now_ms: i64) -> bool {
        match self.first_added_at.entry(product_id) {
            Entry::Vacant(v) => {
                v.insert(now_ms);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn clear_product_active(&self, product_id: ProductId) -> Option<i64> {
        self.first_added_at.remove(&product_id).map(|(_, ts)| ts)
    }

    pub fn is_checked_out(&self, user_id: &str) -> bool {
        self.checked_out.contains(user_id)
    }

    pub fn mark_checked_out(&self, user_id: &str) {
        self.checked_out.insert(user_id.to_string());
    }

    /// Users idle for strictly longer than `threshold` who have not
    /// checked out, sorted.
    pub fn snapshot_inactive_users(&self, threshold: Duration, now_ms: i64) -> Vec<String> {
        let threshold_ms = duration_ms(threshold);
        let mut users: Vec<String> = self
            .last_update_at
            .iter()
            .filter(|e| now_ms - *e.value() > threshold_ms)
            .filter(|e| !self.checked_out.contains(e.key()))
            .map(|e| e.key().clone())
            .collect();
        users.sort();
        users
    }

    pub fn forget(&self, user_id: &str) -> bool {
        self.last_update_at.remove(user_id).is_some()
    }

    /// Removes the user only if they are still idle past `threshold` and
    /// not checked out. Guards against an update landing between a
    /// snapshot and the removal.
    pub fn forget_if_inactive(&self, user_id: &str, threshold: Duration, now_ms: i64) -> bool {
        let threshold_ms = duration_ms(threshold);
        self.last_update_at
            .remove_if(user_id, |_, last| {
                now_ms - *last > threshold_ms && !self.checked_out.contains(user_id)
            })
            .is_some()
    }

    pub fn first_added_at(&self, product_id: ProductId) -> Option<i64> {
        self.first_added_at.get(&product_id).map(|v| *v)
    }

    pub fn last_update_at(&self, user_id: &str) -> Option<i64> {
        self.last_update_at.get(user_id).map(|v| *v)
    }

    pub fn tracked_users(&self) -> usize {
        self.last_update_at.len()
    }

    pub fn active_products(&self) -> usize {
        self.first_added_at.len()
    }

    pub fn checked_out_users(&self) -> usize {
        self.checked_out.len()
    }
}

/// Saturates at `i64::MAX` so an oversized threshold never wraps negative.
fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
