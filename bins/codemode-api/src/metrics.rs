// Prometheus metrics for the judge API

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    // Global registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Answer checks total (counter with language and result labels)
    pub static ref CHECKS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("codemode_checks_total", "Total number of answer checks"),
        &["language", "result"]
    )
    .expect("metric can be created");

    // Check duration histogram (in milliseconds)
    pub static ref CHECK_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "codemode_check_duration_ms",
            "Answer check duration in milliseconds"
        )
        .buckets(vec![100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 15000.0, 60000.0]),
        &["language"]
    )
    .expect("metric can be created");

    // Per-test outcomes (passed, wrong_answer, timed_out, ...)
    pub static ref TEST_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("codemode_test_outcomes_total", "Test case outcomes across all checks"),
        &["outcome"]
    )
    .expect("metric can be created");

    // API request counter
    pub static ref API_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("codemode_api_requests_total", "Total API requests"),
        &["endpoint", "method", "status"]
    )
    .expect("metric can be created");
}

/// Initialize metrics registry
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(CHECKS_TOTAL.clone()))
        .expect("collector can be registered");

    REGISTRY
        .register(Box::new(CHECK_DURATION.clone()))
        .expect("collector can be registered");

    REGISTRY
        .register(Box::new(TEST_OUTCOMES.clone()))
        .expect("collector can be registered");

    REGISTRY
        .register(Box::new(API_REQUESTS.clone()))
        .expect("collector can be registered");
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a finished check
pub fn record_check(language: &str, result: &str, duration_ms: f64) {
    CHECKS_TOTAL.with_label_values(&[language, result]).inc();
    CHECK_DURATION.with_label_values(&[language]).observe(duration_ms);
}

/// Record one test case outcome
pub fn record_test_outcome(outcome: &str) {
    TEST_OUTCOMES.with_label_values(&[outcome]).inc();
}

/// Record an API request
pub fn record_request(endpoint: &str, method: &str, status: u16) {
    API_REQUESTS
        .with_label_values(&[endpoint, method, &status.to_string()])
        .inc();
}
