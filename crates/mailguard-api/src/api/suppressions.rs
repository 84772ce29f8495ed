/// Suppression lookup endpoint
use axum::{
    Json,
    extract::{Path, State},
};
use mailguard_core::constants::EMAIL_CHANNEL;
use mailguard_core::models::DoNotContactEntry;
use mailguard_core::utils::{normalize_address, redact_email};
use std::sync::Arc;
use tracing::error;

use crate::{context::ApiContext, error::ApiError};

/// Get the do-not-contact entry for an address
pub async fn get(
    State(ctx): State<Arc<ApiContext>>,
    Path(address): Path<String>,
) -> Result<Json<DoNotContactEntry>, ApiError> {
    let address = normalize_address(&address);
    if address.is_empty() {
        return Err(ApiError::BadRequest("Address is required".to_string()));
    }

    let entry = ctx
        .processor
        .store()
        .find(&address, EMAIL_CHANNEL)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to look up do-not-contact entry");
            ApiError::Internal(ctx.processor.error_message(&e))
        })?;

    entry.map(Json).ok_or_else(|| {
        ApiError::NotFound(format!(
            "No do-not-contact entry for {}",
            redact_email(&address)
        ))
    })
}
