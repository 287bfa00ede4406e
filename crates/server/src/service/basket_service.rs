use std::sync::Arc;
use tracing::Instrument;

use basket_common::{collect_quantities, BasketLine, Clock, CustomerBasket, ProductId};

use crate::ledger::ActivityLedger;
use crate::metrics::{emit_counter, names, product_tags, MetricsSink};
use crate::reconcile::{apply_change_set, diff, record_lifetime};
use crate::store::BasketStore;

use super::error::BasketError;
use super::request_timer::RequestTimer;

/// Public basket operations. Every call takes an already-resolved user id;
/// an empty id means the caller is anonymous.
#[derive(Clone)]
pub struct BasketService {
    store: Arc<dyn BasketStore>,
    ledger: ActivityLedger,
    sink: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock>,
}

impl BasketService {
    pub fn new(
        store: Arc<dyn BasketStore>,
        ledger: ActivityLedger,
        sink: Arc<dyn MetricsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            ledger,
            sink,
            clock,
        }
    }

    pub fn ledger(&self) -> &ActivityLedger {
        &self.ledger
    }

    /// Anonymous callers and missing baskets both read as empty.
    pub async fn get_basket(&self, user_id: &str) -> Result<CustomerBasket, BasketError> {
        let span = tracing::info_span!(
            "get_basket",
            basket.operation = "retrieve",
            basket.user_id = %display_user(user_id),
            basket.item_count = tracing::field::Empty,
        );
        let timer = RequestTimer::start(self.sink.clone(), "get");
        let result = self.fetch(user_id).instrument(span).await;
        timer.finish(&result);
        result
    }

    pub async fn update_basket(
        &self,
        user_id: &str,
        lines: Vec<BasketLine>,
    ) -> Result<CustomerBasket, BasketError> {
        let span = tracing::info_span!(
            "update_basket",
            basket.operation = "update",
            basket.user_id = %display_user(user_id),
            basket.item_count = lines.len(),
        );
        let timer = RequestTimer::start(self.sink.clone(), "update");
        let result = self.reconcile(user_id, lines).instrument(span).await;
        timer.finish(&result);
        result
    }

    pub async fn delete_basket(&self, user_id: &str) -> Result<(), BasketError> {
        let span = tracing::info_span!(
            "delete_basket",
            basket.operation = "delete",
            basket.user_id = %display_user(user_id),
        );
        let timer = RequestTimer::start(self.sink.clone(), "delete");
        let result = async {
            require_user(user_id)?;
            self.store.delete(user_id).await?;
            Ok::<(), BasketError>(())
        }
        .instrument(span)
        .await;
        timer.finish(&result);
        result
    }

    /// Counts one removal and closes the product's lifetime without
    /// looking at the stored basket, so it can double count a product
    /// the buyer never had.
    pub async fn remove_item(&self, user_id: &str, product_id: ProductId) -> Result<(), BasketError> {
        let span = tracing::info_span!(
            "remove_item",
            basket.operation = "remove_item",
            basket.user_id = %display_user(user_id),
            basket.product_id = product_id,
        );
        let timer = RequestTimer::start(self.sink.clone(), "remove_item");
        let result = span.in_scope(|| {
            require_user(user_id)?;
            emit_counter(
                self.sink.as_ref(),
                names::ITEMS_REMOVED_TOTAL,
                1,
                &product_tags(product_id),
            );
            let lifetime = record_lifetime(
                product_id,
                &self.ledger,
                self.sink.as_ref(),
                self.clock.now_ms(),
            );
            tracing::debug!(lifetime_s = ?lifetime, "item removed");
            Ok(())
        });
        timer.finish(&result);
        result
    }

    /// Excludes the buyer from abandonment detection for the rest of the
    /// process lifetime. Anonymous signals are ignored.
    pub fn mark_checkout_completed(&self, user_id: &str) {
        let timer = RequestTimer::start(self.sink.clone(), "checkout");
        if user_id.is_empty() {
            tracing::debug!("ignoring checkout signal without a user");
        } else {
            self.ledger.mark_checked_out(user_id);
            tracing::info!(user_id = %user_id, "checkout completed");
        }
        timer.finish::<()>(&Ok(()));
    }

    async fn fetch(&self, user_id: &str) -> Result<CustomerBasket, BasketError> {
        if user_id.is_empty() {
            return Ok(CustomerBasket::default());
        }

        tracing::debug!("begin get_basket");
        let basket = self
            .store
            .get(user_id)
            .await?
            .unwrap_or_else(|| CustomerBasket::empty(user_id));
        tracing::Span::current().record("basket.item_count", basket.item_count());
        Ok(basket)
    }

    async fn reconcile(
        &self,
        user_id: &str,
        lines: Vec<BasketLine>,
    ) -> Result<CustomerBasket, BasketError> {
        require_user(user_id)?;

        let previous = self
            .store
            .get(user_id)
            .await?
            .map(|b| b.quantities())
            .unwrap_or_default();
        let requested = collect_quantities(&lines);
        let change_set = diff(&previous, &requested);

        let basket = CustomerBasket::from_quantities(user_id, &requested);
        let stored = self
            .store
            .replace(basket)
            .await?
            .ok_or_else(|| BasketError::NotFound {
                user_id: user_id.to_string(),
            })?;

        // Ledger and item counters only move once the store accepted the write.
        let now_ms = self.clock.now_ms();
        apply_change_set(&change_set, &self.ledger, self.sink.as_ref(), now_ms);
        self.ledger.record_activity(user_id, now_ms);

        tracing::debug!(
            added = change_set.total_added(),
            removed = change_set.total_removed(),
            introduced = change_set.newly_introduced.len(),
            "basket reconciled"
        );
        if stored.is_empty() {
            tracing::debug!("basket emptied by update");
        }
        Ok(stored)
    }
}

fn require_user(user_id: &str) -> Result<(), BasketError> {
    if user_id.is_empty() {
        tracing::debug!("rejecting anonymous caller");
        return Err(BasketError::Unauthenticated);
    }
    Ok(())
}

fn display_user(user_id: &str) -> &str {
    if user_id.is_empty() {
        "anonymous"
    } else {
        user_id
    }
}
