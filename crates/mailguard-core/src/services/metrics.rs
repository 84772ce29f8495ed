/// CloudWatch metrics service for monitoring and observability
use crate::constants::{LOG_TARGET_METRICS, METRICS_NAMESPACE};
use crate::models::DoNotContactReason;
use async_trait::async_trait;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use tracing::{debug, error};

#[async_trait]
pub trait MetricsService: Send + Sync {
    /// Record a counter metric (count of events)
    async fn record_counter(&self, name: &str, value: f64, dimensions: &[(&str, &str)]);
}

/// CloudWatch metrics service implementation
pub struct CloudWatchMetricsService {
    client: aws_sdk_cloudwatch::Client,
    namespace: String,
}

impl CloudWatchMetricsService {
    pub fn new(client: aws_sdk_cloudwatch::Client) -> Self {
        Self::with_namespace(client, METRICS_NAMESPACE.to_string())
    }

    pub fn with_namespace(client: aws_sdk_cloudwatch::Client, namespace: String) -> Self {
        Self { client, namespace }
    }
}

#[async_trait]
impl MetricsService for CloudWatchMetricsService {
    async fn record_counter(&self, name: &str, value: f64, dimensions: &[(&str, &str)]) {
        let dims: Vec<Dimension> = dimensions
            .iter()
            .map(|(k, v)| Dimension::builder().name(*k).value(*v).build())
            .collect();

        let datum = MetricDatum::builder()
            .metric_name(name)
            .value(value)
            .unit(StandardUnit::Count)
            .timestamp(aws_smithy_types::DateTime::from(
                std::time::SystemTime::now(),
            ))
            .set_dimensions(if dims.is_empty() { None } else { Some(dims) })
            .build();

        // Metrics never fail the request
        match self
            .client
            .put_metric_data()
            .namespace(&self.namespace)
            .metric_data(datum)
            .send()
            .await
        {
            Ok(_) => debug!(target: LOG_TARGET_METRICS, metric = name, value = value, "Emitted metric"),
            Err(e) => error!(
                target: LOG_TARGET_METRICS,
                metric = name,
                error = %e,
                "Failed to emit metric to CloudWatch"
            ),
        }
    }
}

/// Metrics sink used when metrics are disabled
pub struct NoopMetricsService;

#[async_trait]
impl MetricsService for NoopMetricsService {
    async fn record_counter(&self, name: &str, value: f64, _dimensions: &[(&str, &str)]) {
        debug!(target: LOG_TARGET_METRICS, metric = name, value = value, "Metric (disabled)");
    }
}

/// Helper functions for commonly used metrics
pub struct Metrics;

impl Metrics {
    pub async fn notification_processed(service: &dyn MetricsService, kind: &str) {
        service
            .record_counter("NotificationsProcessed", 1.0, &[("Type", kind)])
            .await;
    }

    pub async fn dnc_recorded(service: &dyn MetricsService, reason: DoNotContactReason) {
        service
            .record_counter("DoNotContactRecorded", 1.0, &[("Reason", reason.as_str())])
            .await;
    }

    pub async fn unknown_notification(service: &dyn MetricsService) {
        service.record_counter("UnknownNotifications", 1.0, &[]).await;
    }

    pub async fn subscription_confirmation(service: &dyn MetricsService, confirmed: bool) {
        let result = if confirmed { "confirmed" } else { "failed" };
        service
            .record_counter("SubscriptionConfirmations", 1.0, &[("Result", result)])
            .await;
    }
}
