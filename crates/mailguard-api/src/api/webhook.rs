/// SES/SNS feedback webhook endpoint
use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{context::ApiContext, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub message: String,
    pub success: bool,
}

/// Receive an SNS/SES callback
///
/// The body is read raw: SNS posts JSON with a `text/plain` content type.
pub async fn ses(
    State(ctx): State<Arc<ApiContext>>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let processor = &ctx.processor;

    match processor.process_body(&body).await {
        Ok(outcome) => {
            info!(
                kind = %outcome.kind,
                recipients = outcome.recipients,
                recorded = outcome.recorded,
                "Processed SES callback"
            );
            Ok(Json(WebhookResponse {
                message: processor.outcome_message(&outcome),
                success: true,
            }))
        }
        Err(err) => {
            if err.status_code() >= 500 {
                error!(error = %err, "Failed to process SES callback");
            } else {
                warn!(error = %err, "Rejected SES callback");
            }
            Err(ApiError::from_core(&err, processor.error_message(&err)))
        }
    }
}
