pub const REQUESTS_TOTAL: &str = "basket_api_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "basket_api_request_duration_seconds";
pub const ITEMS_ADDED_TOTAL: &str = "basket_items_added_total";
pub const ITEMS_REMOVED_TOTAL: &str = "basket_items_removed_total";
pub const ITEM_LIFETIME_SECONDS: &str = "basket_item_lifetime_seconds";
pub const ABANDONED_CARTS_TOTAL: &str = "basket_abandoned_carts_total";
