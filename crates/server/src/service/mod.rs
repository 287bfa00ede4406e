mod basket_service;
mod error;
mod request_timer;

pub use basket_service::BasketService;
pub use error::BasketError;
