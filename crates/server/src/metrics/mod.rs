pub mod exposition;
pub mod names;
pub mod registry;
pub mod sink;

pub use registry::{HistogramSummary, MetricsRegistry};
pub use sink::{emit_counter, emit_histogram, product_tags, tags, MetricsError, MetricsSink, Tags};
