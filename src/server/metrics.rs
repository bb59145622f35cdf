//! Prometheus metrics.
//!
//! Metrics live in the process-wide default registry and are exposed in the text format at
//! `GET /metrics`. Registration happens on first use; if it fails the service keeps running and
//! the failed metrics are simply absent from the scrape.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

/// HTTP request latency buckets (seconds)
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance, registered on first access
pub static METRICS: Lazy<Result<Metrics, prometheus::Error>> = Lazy::new(Metrics::new);

/// Container for the service metrics.
#[derive(Clone)]
pub struct Metrics {
    /// Requests served - labels: method, handler, status
    pub http_requests_total: CounterVec,
    /// Request latency - labels: method, handler
    pub http_request_duration_seconds: HistogramVec,
    /// Accepted `sort_by` values - labels: sort_by
    pub sort_by_requests_total: CounterVec,
}

impl Metrics {
    /// Create and register every metric with the default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "http_requests_total",
                "Total number of HTTP requests",
                &["method", "handler", "status"]
            )?,
            http_request_duration_seconds: register_histogram_vec!(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "handler"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )?,
            sort_by_requests_total: register_counter_vec!(
                "http_sort_by_requests_total",
                "Number of valid requests grouped by ?sort_by value",
                &["sort_by"]
            )?,
        })
    }

    /// Record a completed HTTP request.
    pub fn record_http_request(&self, method: &str, handler: &str, status: u16, duration_secs: f64) {
        let status = status.to_string();

        self.http_requests_total
            .with_label_values(&[method, handler, status.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, handler])
            .observe(duration_secs);
    }

    /// Count one accepted request per sort field it names.
    pub fn record_sort_fields<'a>(&self, fields: impl IntoIterator<Item = &'a str>) {
        for field in fields {
            self.sort_by_requests_total.with_label_values(&[field]).inc();
        }
    }
}

/// The registered metrics, or `None` when registration failed.
pub fn metrics() -> Option<&'static Metrics> {
    METRICS.as_ref().ok()
}

/// Force registration at startup so a failure is logged once instead of silently dropping
/// every sample.
pub fn init_metrics() {
    if let Err(e) = METRICS.as_ref() {
        tracing::warn!("Failed to register metrics, continuing without them: {}", e);
    }
}

/// Encode every metric of the default registry in the Prometheus text format.
pub fn encode() -> Result<(String, Vec<u8>), prometheus::Error> {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&families, &mut buffer)?;

    Ok((encoder.format_type().to_string(), buffer))
}
