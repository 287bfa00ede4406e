use basket_common::ProductId;

use crate::ledger::ActivityLedger;
use crate::metrics::{emit_counter, emit_histogram, names, product_tags, MetricsSink};

use super::change_set::ChangeSet;

/// Applies the emission policy for one change set: counters for every
/// delta, first-seen tracking for introduced products and a lifetime
/// observation for products that left the basket.
pub fn apply_change_set(
    change_set: &ChangeSet,
    ledger: &ActivityLedger,
    sink: &dyn MetricsSink,
    now_ms: i64,
) {
    if change_set.is_empty() {
        return;
    }

    for &pid in &change_set.fully_removed {
        if let Some(&qty) = change_set.removed.get(&pid) {
            emit_counter(sink, names::ITEMS_REMOVED_TOTAL, qty as u64, &product_tags(pid));
            record_lifetime(pid, ledger, sink, now_ms);
        }
    }
    for (pid, delta) in change_set.partial_removals() {
        emit_counter(sink, names::ITEMS_REMOVED_TOTAL, delta as u64, &product_tags(pid));
    }

    for &pid in &change_set.newly_introduced {
        if let Some(&qty) = change_set.added.get(&pid) {
            emit_counter(sink, names::ITEMS_ADDED_TOTAL, qty as u64, &product_tags(pid));
            ledger.mark_product_active(pid, now_ms);
        }
    }
    for (pid, delta) in change_set.partial_additions() {
        emit_counter(sink, names::ITEMS_ADDED_TOTAL, delta as u64, &product_tags(pid));
    }
}

/// Clears the product's first-seen entry and observes how long it was
/// tracked. Untracked products emit nothing.
pub fn record_lifetime(
    product_id: ProductId,
    ledger: &ActivityLedger,
    sink: &dyn MetricsSink,
    now_ms: i64,
) -> Option<f64> {
    let first_ms = ledger.clear_product_active(product_id)?;
    let secs = (now_ms - first_ms).max(0) as f64 / 1000.0;
    emit_histogram(sink, names::ITEM_LIFETIME_SECONDS, secs, &product_tags(product_id));
    Some(secs)
}
