/// Mailguard API - SES feedback webhook Lambda
///
/// This module wires the webhook, suppression lookup and health endpoints
/// into an axum router served through the Lambda HTTP runtime.
pub mod api;
pub mod context;
pub mod error;
pub mod middleware;

pub use context::ApiContext;
pub use error::ApiError;

use axum::{
    Router,
    body::Body as AxumBody,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use lambda_http::{Body, Error as LambdaError, Request, Response};
use std::sync::Arc;
use tower::ServiceExt;
use tracing::error;

/// SNS messages are at most 256 KB; leave room for the envelope
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the API router
pub fn router(ctx: Arc<ApiContext>) -> Router {
    let v1_router = Router::new()
        .route("/health", get(api::health::handler))
        .route("/webhooks/ses", post(api::webhook::ses))
        .route("/suppressions/{address}", get(api::suppressions::get));

    Router::new()
        .nest("/v1", v1_router)
        .route_layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(ctx)
}

/// Main API handler - converts Lambda HTTP request to Axum router
pub async fn handler(ctx: Arc<ApiContext>, event: Request) -> Result<Response<Body>, LambdaError> {
    let app = router(ctx);

    // Convert Lambda HTTP request to Axum request
    let (parts, body) = event.into_parts();
    let body_bytes = body.to_vec();

    let axum_request = http::Request::from_parts(parts, AxumBody::from(body_bytes));

    match app.oneshot(axum_request).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();

            // Convert Axum response body to Lambda response body
            let body_bytes = axum::body::to_bytes(body, usize::MAX)
                .await
                .unwrap_or_default();

            Ok(Response::from_parts(parts, Body::from(body_bytes.to_vec())))
        }
        Err(err) => {
            error!("Axum router error: {}", err);
            let response = Response::builder().status(500).body(Body::from(
                serde_json::json!({
                    "message": "Internal server error",
                    "success": false
                })
                .to_string(),
            ))?;
            Ok(response)
        }
    }
}
