use std::fmt::Write;
use std::sync::Arc;

use super::registry::{HistogramSummary, MetricsRegistry};

pub fn render_prometheus(m: &Arc<MetricsRegistry>) -> String {
    let mut out = String::with_capacity(1024);

    let mut last_name: Option<String> = None;
    for (name, labels, val) in m.counter_series() {
        if last_name.as_deref() != Some(name.as_str()) {
            let _ = writeln!(out, "# TYPE {name} counter");
            last_name = Some(name.clone());
        }
        write_counter(&mut out, &name, &labels, val);
    }

    last_name = None;
    for (name, labels, summary) in m.histogram_series() {
        if last_name.as_deref() != Some(name.as_str()) {
            let _ = writeln!(out, "# TYPE {name} summary");
            last_name = Some(name.clone());
        }
        write_summary(&mut out, &name, &labels, summary);
    }

    out
}

fn write_counter(out: &mut String, name: &str, labels: &[(String, String)], val: u64) {
    let _ = writeln!(out, "{name}{} {val}", format_labels(labels));
}

fn write_summary(out: &mut String, name: &str, labels: &[(String, String)], s: HistogramSummary) {
    let l = format_labels(labels);
    let _ = writeln!(out, "{name}_sum{l} {}", s.sum);
    let _ = writeln!(out, "{name}_count{l} {}", s.count);
}

fn format_labels(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect();
    format!("{{{}}}", inner.join(","))
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
