//! Metrics infrastructure
//!
//! Provides [`JsonlMetricsSink`], an append-only JSONL file writer that
//! implements the [`MetricsSink`](quorum_application::MetricsSink) port.

mod jsonl_sink;

pub use jsonl_sink::JsonlMetricsSink;
