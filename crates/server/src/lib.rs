pub mod config;
pub mod ledger;
pub mod metrics;
pub mod monitor;
pub mod reconcile;
pub mod rest;
pub mod service;
pub mod shutdown;
pub mod store;
