use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use basket_common::CustomerBasket;

use super::basket_store::{BasketStore, StoreError};

/// DashMap-backed store. `replace` upserts and reads the record back, the
/// way a plain key-value backend behaves.
#[derive(Clone, Default)]
pub struct InMemoryBasketStore {
    baskets: Arc<DashMap<String, CustomerBasket>>,
    replace_calls: Arc<AtomicUsize>,
}

impl InMemoryBasketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, basket: CustomerBasket) {
        self.baskets.insert(basket.buyer_id.clone(), basket);
    }

    pub fn count(&self) -> usize {
        self.baskets.len()
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl BasketStore for InMemoryBasketStore {
    async fn get(&self, user_id: &str) -> Result<Option<CustomerBasket>, StoreError> {
        Ok(self.baskets.get(user_id).map(|b| b.clone()))
    }

    async fn replace(&self, basket: CustomerBasket) -> Result<Option<CustomerBasket>, StoreError> {
        self.replace_calls.fetch_add(1, Ordering::Relaxed);
        let key = basket.buyer_id.clone();
        self.baskets.insert(key.clone(), basket);
        Ok(self.baskets.get(&key).map(|b| b.clone()))
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.baskets.remove(user_id);
        Ok(())
    }
}
