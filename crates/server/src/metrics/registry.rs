use dashmap::DashMap;
use std::sync::Arc;

use super::sink::{MetricsError, MetricsSink, Tags};

type Labels = Vec<(String, String)>;
type SeriesKey = (String, Labels);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    Counter,
    Histogram,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistogramSummary {
    pub sum: f64,
    pub count: u64,
}

/// In-process aggregation of counters and histograms, one series per
/// metric name and tag set. A name keeps the kind it was first used with.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    kinds: DashMap<String, MetricKind>,
    counters: DashMap<SeriesKey, u64>,
    histograms: DashMap<SeriesKey, HistogramSummary>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn claim(&self, name: &str, kind: MetricKind) -> Result<(), MetricsError> {
        let registered = *self.kinds.entry(name.to_string()).or_insert(kind);
        if registered == kind {
            Ok(())
        } else {
            Err(MetricsError::Rejected(format!(
                "{name} is registered as a {registered:?}"
            )))
        }
    }

    pub fn counter_value(&self, name: &str, tags: &Tags) -> u64 {
        self.counters
            .get(&series_key(name, tags))
            .map(|v| *v)
            .unwrap_or(0)
    }

    /// Sum of a counter across every tag set.
    pub fn counter_total(&self, name: &str) -> u64 {
        self.counters
            .iter()
            .filter(|e| e.key().0 == name)
            .map(|e| *e.value())
            .sum()
    }

    pub fn histogram(&self, name: &str, tags: &Tags) -> Option<HistogramSummary> {
        self.histograms.get(&series_key(name, tags)).map(|h| *h)
    }

    pub fn histogram_count_total(&self, name: &str) -> u64 {
        self.histograms
            .iter()
            .filter(|e| e.key().0 == name)
            .map(|e| e.value().count)
            .sum()
    }

    pub fn counter_series(&self) -> Vec<(String, Labels, u64)> {
        let mut out: Vec<_> = self
            .counters
            .iter()
            .map(|e| (e.key().0.clone(), e.key().1.clone(), *e.value()))
            .collect();
        out.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        out
    }

    pub fn histogram_series(&self) -> Vec<(String, Labels, HistogramSummary)> {
        let mut out: Vec<_> = self
            .histograms
            .iter()
            .map(|e| (e.key().0.clone(), e.key().1.clone(), *e.value()))
            .collect();
        out.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        out
    }
}

impl MetricsSink for MetricsRegistry {
    fn increment_counter(&self, name: &str, amount: u64, tags: &Tags) -> Result<(), MetricsError> {
        validate_name(name)?;
        self.claim(name, MetricKind::Counter)?;
        *self.counters.entry(series_key(name, tags)).or_insert(0) += amount;
        Ok(())
    }

    fn observe_histogram(&self, name: &str, value: f64, tags: &Tags) -> Result<(), MetricsError> {
        validate_name(name)?;
        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidValue {
                name: name.to_string(),
                value,
            });
        }
        self.claim(name, MetricKind::Histogram)?;
        let mut entry = self.histograms.entry(series_key(name, tags)).or_default();
        entry.sum += value;
        entry.count += 1;
        Ok(())
    }
}

fn series_key(name: &str, tags: &Tags) -> SeriesKey {
    let labels = tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    (name.to_string(), labels)
}

fn validate_name(name: &str) -> Result<(), MetricsError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    if valid {
        Ok(())
    } else {
        Err(MetricsError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::sink::{product_tags, tags};

    #[test]
    fn counters_accumulate_per_series() {
        let r = MetricsRegistry::new();
        r.increment_counter("items_total", 2, &product_tags(1)).unwrap();
        r.increment_counter("items_total", 3, &product_tags(1)).unwrap();
        r.increment_counter("items_total", 1, &product_tags(2)).unwrap();
        assert_eq!(r.counter_value("items_total", &product_tags(1)), 5);
        assert_eq!(r.counter_value("items_total", &product_tags(2)), 1);
        assert_eq!(r.counter_total("items_total"), 6);
    }

    #[test]
    fn tag_order_does_not_split_series() {
        let r = MetricsRegistry::new();
        let a = tags(&[("a", "1"), ("b", "2")]);
        let b = tags(&[("b", "2"), ("a", "1")]);
        r.increment_counter("c", 1, &a).unwrap();
        r.increment_counter("c", 1, &b).unwrap();
        assert_eq!(r.counter_value("c", &a), 2);
    }

    #[test]
    fn histogram_tracks_sum_and_count() {
        let r = MetricsRegistry::new();
        r.observe_histogram("lat", 1.5, &Tags::new()).unwrap();
        r.observe_histogram("lat", 0.5, &Tags::new()).unwrap();
        let h = r.histogram("lat", &Tags::new()).unwrap();
        assert_eq!(h.count, 2);
        assert!((h.sum - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn name_keeps_its_first_kind() {
        let r = MetricsRegistry::new();
        r.increment_counter("items_total", 1, &Tags::new()).unwrap();
        let err = r.observe_histogram("items_total", 1.0, &Tags::new()).unwrap_err();
        assert!(matches!(err, MetricsError::Rejected(_)));
        assert_eq!(r.histogram_count_total("items_total"), 0);

        r.observe_histogram("lat", 1.0, &Tags::new()).unwrap();
        assert!(r.increment_counter("lat", 1, &Tags::new()).is_err());
        assert_eq!(r.counter_total("lat"), 0);
    }

    #[test]
    fn rejects_invalid_name_and_value() {
        let r = MetricsRegistry::new();
        assert!(r.increment_counter("bad name", 1, &Tags::new()).is_err());
        assert!(r.observe_histogram("lat", f64::NAN, &Tags::new()).is_err());
        assert!(r.observe_histogram("lat", -1.0, &Tags::new()).is_err());
        assert_eq!(r.histogram_count_total("lat"), 0);
    }
}
