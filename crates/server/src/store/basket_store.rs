use basket_common::CustomerBasket;

#[async_trait::async_trait]
pub trait BasketStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<CustomerBasket>, StoreError>;

    /// Writes the whole basket. `None` means the target record no longer
    /// exists and the write was not applied.
    async fn replace(&self, basket: CustomerBasket) -> Result<Option<CustomerBasket>, StoreError>;

    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store backend: {0}")]
    Backend(String),
}
