mod abandonment;
mod task;

pub use abandonment::AbandonmentMonitor;
pub use task::{MonitorHandle, MonitorTask, MAX_PERIOD};
