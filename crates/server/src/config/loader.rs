use std::path::Path;

use super::schema::ServiceConfig;
use crate::monitor::MAX_PERIOD;

/// One year.
const MAX_THRESHOLD_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_from_file(path: &Path) -> Result<ServiceConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<ServiceConfig, LoadError> {
    let cfg: ServiceConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Reads `BASKET_CONFIG` if set, then applies the `BASKET_*` overrides.
pub fn load_from_env() -> Result<ServiceConfig, LoadError> {
    let mut cfg = match std::env::var("BASKET_CONFIG") {
        Ok(path) => load_from_file(Path::new(&path))?,
        Err(_) => ServiceConfig::default(),
    };
    apply_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

fn apply_overrides(
    cfg: &mut ServiceConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), LoadError> {
    if let Some(addr) = lookup("BASKET_REST_ADDR") {
        cfg.rest_addr = addr
            .parse()
            .map_err(|_| LoadError::Validation(format!("BASKET_REST_ADDR {addr:?} is not a socket address")))?;
    }
    if let Some(v) = lookup("BASKET_MONITOR_PERIOD_SECS") {
        cfg.monitor.period_seconds = parse_secs("BASKET_MONITOR_PERIOD_SECS", &v)?;
    }
    if let Some(v) = lookup("BASKET_ABANDON_THRESHOLD_SECS") {
        cfg.monitor.abandonment_threshold_seconds = parse_secs("BASKET_ABANDON_THRESHOLD_SECS", &v)?;
    }
    Ok(())
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, LoadError> {
    raw.trim()
        .parse()
        .map_err(|_| LoadError::Validation(format!("{key} must be a whole number of seconds")))
}

fn validate(cfg: &ServiceConfig) -> Result<(), LoadError> {
    if cfg.monitor.period_seconds == 0 {
        return Err(LoadError::Validation(
            "monitor.period_seconds must be > 0".into(),
        ));
    }
    if cfg.monitor.period_seconds > MAX_PERIOD.as_secs() {
        return Err(LoadError::Validation(format!(
            "monitor.period_seconds must be <= {}",
            MAX_PERIOD.as_secs()
        )));
    }
    if cfg.monitor.abandonment_threshold_seconds == 0 {
        return Err(LoadError::Validation(
            "monitor.abandonment_threshold_seconds must be > 0".into(),
        ));
    }
    if cfg.monitor.abandonment_threshold_seconds > MAX_THRESHOLD_SECS {
        return Err(LoadError::Validation(format!(
            "monitor.abandonment_threshold_seconds must be <= {MAX_THRESHOLD_SECS}"
        )));
    }
    Ok(())
}
