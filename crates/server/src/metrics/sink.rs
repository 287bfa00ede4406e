use std::collections::BTreeMap;

use basket_common::ProductId;

pub type Tags = BTreeMap<String, String>;

pub trait MetricsSink: Send + Sync {
    fn increment_counter(&self, name: &str, amount: u64, tags: &Tags) -> Result<(), MetricsError>;
    fn observe_histogram(&self, name: &str, value: f64, tags: &Tags) -> Result<(), MetricsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("invalid metric name {0:?}")]
    InvalidName(String),
    #[error("invalid value {value} for {name}")]
    InvalidValue { name: String, value: f64 },
    #[error("sink rejected observation: {0}")]
    Rejected(String),
}

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn product_tags(product_id: ProductId) -> Tags {
    let mut t = Tags::new();
    t.insert("product_id".into(), product_id.to_string());
    t
}

/// Best-effort: a failed emission is logged and otherwise ignored.
pub fn emit_counter(sink: &dyn MetricsSink, name: &str, amount: u64, tags: &Tags) {
    if let Err(e) = sink.increment_counter(name, amount, tags) {
        tracing::warn!(metric = name, error = %e, "counter emission failed");
    }
}

pub fn emit_histogram(sink: &dyn MetricsSink, name: &str, value: f64, tags: &Tags) {
    if let Err(e) = sink.observe_histogram(name, value, tags) {
        tracing::warn!(metric = name, error = %e, "histogram emission failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl MetricsSink for FailingSink {
        fn increment_counter(&self, _: &str, _: u64, _: &Tags) -> Result<(), MetricsError> {
            Err(MetricsError::Rejected("down".into()))
        }

        fn observe_histogram(&self, _: &str, _: f64, _: &Tags) -> Result<(), MetricsError> {
            Err(MetricsError::Rejected("down".into()))
        }
    }

    #[test]
    fn emit_swallows_sink_errors() {
        emit_counter(&FailingSink, "c", 1, &Tags::new());
        emit_histogram(&FailingSink, "h", 1.0, &Tags::new());
    }

    #[test]
    fn product_tags_uses_decimal_id() {
        let t = product_tags(42);
        assert_eq!(t.get("product_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn tags_from_pairs() {
        let t = tags(&[("operation", "update"), ("outcome", "ok")]);
        assert_eq!(t.len(), 2);
        assert_eq!(t["outcome"], "ok");
    }
}
