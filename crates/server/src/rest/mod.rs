mod basket;
mod health;
mod metrics;
mod router;

pub use basket::USER_ID_HEADER;
pub use router::{router, AppState};
