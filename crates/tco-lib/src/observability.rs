//! Observability infrastructure for TCO estimation
//!
//! Provides:
//! - Prometheus metrics (analysis counts, validation failures, calculation latency)
//! - Structured logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for calculation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<TcoMetricsInner> = OnceLock::new();

struct TcoMetricsInner {
    analyses_total: IntCounterVec,
    validation_failures_total: IntCounter,
    optimizations_total: IntCounter,
    calculation_latency_seconds: Histogram,
    last_monthly_cost_usd: GaugeVec,
}

impl TcoMetricsInner {
    fn new() -> Self {
        Self {
            analyses_total: register_int_counter_vec!(
                "telco_tco_analyses_total",
                "Number of cost analyses produced",
                &["user_plane"]
            )
            .expect("Failed to register analyses_total"),

            validation_failures_total: register_int_counter!(
                "telco_tco_validation_failures_total",
                "Number of deployment specifications rejected by validation"
            )
            .expect("Failed to register validation_failures_total"),

            optimizations_total: register_int_counter!(
                "telco_tco_optimizations_total",
                "Number of optimization recommendations emitted"
            )
            .expect("Failed to register optimizations_total"),

            calculation_latency_seconds: register_histogram!(
                "telco_tco_calculation_latency_seconds",
                "Time spent pricing a deployment",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register calculation_latency_seconds"),

            last_monthly_cost_usd: register_gauge_vec!(
                "telco_tco_last_monthly_cost_usd",
                "Monthly total of the most recent analysis",
                &["region", "user_plane"]
            )
            .expect("Failed to register last_monthly_cost_usd"),
        }
    }
}

/// Handle to the process-wide TCO metrics
///
/// Clones share the same underlying Prometheus collectors.
#[derive(Clone)]
pub struct TcoMetrics {
    _private: (),
}

impl Default for TcoMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TcoMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(TcoMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &TcoMetricsInner {
        GLOBAL_METRICS.get_or_init(TcoMetricsInner::new)
    }

    /// Record a finished analysis
    pub fn record_analysis(
        &self,
        region: &str,
        user_plane: &str,
        monthly_total: f64,
        latency_secs: f64,
    ) {
        let inner = self.inner();
        inner.analyses_total.with_label_values(&[user_plane]).inc();
        inner.calculation_latency_seconds.observe(latency_secs);
        inner
            .last_monthly_cost_usd
            .with_label_values(&[region, user_plane])
            .set(monthly_total);
    }

    pub fn inc_validation_failures(&self) {
        self.inner().validation_failures_total.inc();
    }

    pub fn add_optimizations(&self, count: usize) {
        self.inner().optimizations_total.inc_by(count as u64);
    }

    pub fn analyses_count(&self, user_plane: &str) -> u64 {
        self.inner().analyses_total.with_label_values(&[user_plane]).get()
    }

    pub fn validation_failures_count(&self) -> u64 {
        self.inner().validation_failures_total.get()
    }
}

/// Structured logger for estimator events
///
/// Every event carries an `event` field and the emitting `service`.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_analysis(
        &self,
        region: &str,
        user_plane: &str,
        sites: u32,
        monthly_total: f64,
        three_year_tco: f64,
        recommendations: usize,
    ) {
        info!(
            event = "analysis_completed",
            service = %self.service,
            region = %region,
            user_plane = %user_plane,
            sites = sites,
            monthly_total = monthly_total,
            three_year_tco = three_year_tco,
            recommendations = recommendations,
            "Cost analysis completed"
        );
    }

    pub fn log_validation_failure(&self, field: &str, reason: &str) {
        warn!(
            event = "validation_failed",
            service = %self.service,
            field = %field,
            reason = %reason,
            "Deployment specification rejected"
        );
    }

    pub fn log_optimizations(&self, count: usize, total_savings: f64) {
        info!(
            event = "optimizations_generated",
            service = %self.service,
            count = count,
            total_savings = total_savings,
            "Optimization recommendations generated"
        );
    }

    pub fn log_startup(&self, version: &str, pricing_version: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            pricing_version = %pricing_version,
            "TCO service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "TCO service shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_record_analysis() {
        let metrics = TcoMetrics::new();
        let before = metrics.analyses_count("outposts");

        metrics.record_analysis("us-east-1", "outposts", 1234.0, 0.0002);
        metrics.add_optimizations(3);

        assert!(metrics.analyses_count("outposts") > before);
    }

    #[test]
    fn test_validation_failure_counter_increments() {
        let metrics = TcoMetrics::new();
        let before = metrics.validation_failures_count();
        metrics.inc_validation_failures();
        assert!(metrics.validation_failures_count() > before);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("tco-test");
        assert_eq!(logger.service, "tco-test");
        logger.log_validation_failure("vcpu", "vcpu must be >= 1, got 0");
    }
}
