/// API Context - shared state for all API handlers
use lambda_http::Error;
use mailguard_core::FeedbackProcessor;
use mailguard_core::models::{StoreBackend, WebhookConfig};
use mailguard_core::services::{
    CloudWatchMetricsService, DoNotContactStore, DynamoDbDoNotContactStore,
    HttpSubscriptionConfirmer, InMemoryDoNotContactStore, MetricsService, NoopMetricsService,
    SecurityValidator,
};
use mailguard_core::Translator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// API Context contains shared resources for API handlers
pub struct ApiContext {
    /// Loaded configuration
    pub config: WebhookConfig,

    /// Feedback processor with its store, confirmer and metrics
    pub processor: FeedbackProcessor,
}

impl ApiContext {
    /// Create a new API context from the environment
    pub async fn new() -> Result<Arc<Self>, Error> {
        let config = WebhookConfig::from_env()?;

        // Load AWS config
        let aws_config = aws_config::load_from_env().await;

        let store: Arc<dyn DoNotContactStore> = match config.store.backend {
            StoreBackend::DynamoDb => {
                let table = config
                    .store
                    .table
                    .clone()
                    .ok_or("DNC_TABLE environment variable not set")?;
                info!(table = %table, "Using DynamoDB do-not-contact store");
                Arc::new(DynamoDbDoNotContactStore::new(
                    aws_sdk_dynamodb::Client::new(&aws_config),
                    table,
                ))
            }
            StoreBackend::Memory => {
                warn!("Using in-memory do-not-contact store; entries are lost on restart");
                Arc::new(InMemoryDoNotContactStore::new())
            }
        };

        let metrics: Arc<dyn MetricsService> = if config.metrics.enabled {
            Arc::new(CloudWatchMetricsService::with_namespace(
                aws_sdk_cloudwatch::Client::new(&aws_config),
                config.metrics.namespace.clone(),
            ))
        } else {
            Arc::new(NoopMetricsService)
        };

        let confirmer = Arc::new(HttpSubscriptionConfirmer::new(Duration::from_secs(
            config.confirm_timeout_secs,
        ))?);

        let processor = FeedbackProcessor::new(
            store,
            confirmer,
            metrics,
            SecurityValidator::new(config.security.clone()),
            Translator::new(&config.locale),
        );

        Ok(Self::with_processor(config, processor))
    }

    /// Create a context around an already built processor
    pub fn with_processor(config: WebhookConfig, processor: FeedbackProcessor) -> Arc<Self> {
        Arc::new(Self { config, processor })
    }
}
