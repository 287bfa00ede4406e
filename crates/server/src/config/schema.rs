use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default = "default_rest_addr")]
    pub rest_addr: SocketAddr,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MonitorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_period")]
    pub period_seconds: u64,
    #[serde(default = "default_threshold")]
    pub abandonment_threshold_seconds: u64,
}

impl MonitorConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_seconds)
    }

    pub fn abandonment_threshold(&self) -> Duration {
        Duration::from_secs(self.abandonment_threshold_seconds)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            rest_addr: default_rest_addr(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            period_seconds: default_period(),
            abandonment_threshold_seconds: default_threshold(),
        }
    }
}

fn default_rest_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_period() -> u64 {
    60
}

fn default_threshold() -> u64 {
    30 * 60
}

fn default_enabled() -> bool {
    true
}
