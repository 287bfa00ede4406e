mod basket_store;
mod memory_store;

pub use basket_store::{BasketStore, StoreError};
pub use memory_store::InMemoryBasketStore;
