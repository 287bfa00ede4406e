pub mod basket;
pub mod clock;

pub use basket::{collect_quantities, BasketLine, CustomerBasket, ProductId, Quantity};
pub use clock::{now_ms, Clock, ManualClock, SystemClock};
