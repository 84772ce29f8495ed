/// Router-level tests for the webhook, suppression and health endpoints
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use mailguard_api::{ApiContext, router};
use mailguard_core::models::{DoNotContactReason, WebhookConfig};
use mailguard_core::services::{
    ConfirmationResponse, InMemoryDoNotContactStore, NoopMetricsService, SecurityValidator,
    SubscriptionConfirmer,
};
use mailguard_core::{FeedbackProcessor, MailguardError, Translator};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedConfirmer(u16);

#[async_trait]
impl SubscriptionConfirmer for FixedConfirmer {
    async fn confirm(&self, _subscribe_url: &str) -> Result<ConfirmationResponse, MailguardError> {
        Ok(ConfirmationResponse {
            status: self.0,
            body: String::new(),
        })
    }
}

fn app_with(store: Arc<InMemoryDoNotContactStore>, confirm_status: u16, locale: &str) -> Router {
    let config = WebhookConfig {
        locale: locale.to_string(),
        ..WebhookConfig::default()
    };
    let processor = FeedbackProcessor::new(
        store,
        Arc::new(FixedConfirmer(confirm_status)),
        Arc::new(NoopMetricsService),
        SecurityValidator::new(config.security.clone()),
        Translator::new(&config.locale),
    );
    router(ApiContext::with_processor(config, processor))
}

fn app(store: Arc<InMemoryDoNotContactStore>) -> Router {
    app_with(store, 200, "en")
}

async fn post_webhook(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/webhooks/ses")
        .header("content-type", "text/plain; charset=UTF-8")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn sns_wrap(message: Value) -> String {
    json!({
        "Type": "Notification",
        "MessageId": "sns-1",
        "TopicArn": "arn:aws:sns:us-east-1:123456789012:ses-feedback",
        "Message": message.to_string()
    })
    .to_string()
}

#[tokio::test]
async fn test_complaint_returns_success_and_unsubscribes() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let body = sns_wrap(json!({
        "notificationType": "Complaint",
        "complaint": {"complainedRecipients": [{"emailAddress": "Jane <jane@example.com>"}]}
    }));

    let (status, json) = post_webhook(app(store.clone()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Callback processed");

    let entries = store.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address, "jane@example.com");
    assert_eq!(entries[0].reason, DoNotContactReason::Unsubscribed);
}

#[tokio::test]
async fn test_permanent_bounce_via_event_publishing() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let body = json!({
        "eventType": "Bounce",
        "bounce": {
            "bounceType": "Permanent",
            "bouncedRecipients": [{"emailAddress": "gone@example.com"}]
        }
    })
    .to_string();

    let (status, _) = post_webhook(app(store.clone()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.entries().await[0].reason, DoNotContactReason::Bounced);
}

#[tokio::test]
async fn test_malformed_json_is_400_with_fixed_message() {
    for body in ["{", "not json", "", "[]"] {
        let store = Arc::new(InMemoryDoNotContactStore::new());
        let (status, json) = post_webhook(app(store), body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid JSON payload");
    }
}

#[tokio::test]
async fn test_malformed_json_message_is_localized() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let (status, json) = post_webhook(app_with(store, 200, "de"), "{".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Ungültige JSON-Nutzlast");
}

#[tokio::test]
async fn test_missing_type_is_400() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let (status, json) = post_webhook(app(store), json!({"bounce": {}}).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_invalid_notification_message_is_400() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let body = json!({"Type": "Notification", "Message": "{oops"}).to_string();

    let (status, json) = post_webhook(app(store), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "The notification message could not be decoded");
}

#[tokio::test]
async fn test_unknown_type_is_reported_not_failed() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let (status, json) =
        post_webhook(app(store), json!({"eventType": "Open"}).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Unknown notification type: Open");
}

#[tokio::test]
async fn test_subscription_confirmation() {
    let body = json!({
        "Type": "SubscriptionConfirmation",
        "SubscribeURL": "https://sns.eu-west-1.amazonaws.com/?Action=ConfirmSubscription&Token=t"
    })
    .to_string();

    let store = Arc::new(InMemoryDoNotContactStore::new());
    let (status, json) = post_webhook(app_with(store, 200, "en"), body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let store = Arc::new(InMemoryDoNotContactStore::new());
    let (status, json) = post_webhook(app_with(store, 403, "en"), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "The subscription could not be confirmed");
}

#[tokio::test]
async fn test_suppression_lookup() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let body = json!({
        "notificationType": "Bounce",
        "bounce": {
            "bounceType": "Permanent",
            "bouncedRecipients": [{"emailAddress": "gone@example.com", "diagnosticCode": "550"}]
        }
    })
    .to_string();
    post_webhook(app(store.clone()), body).await;

    let request = Request::builder()
        .uri("/v1/suppressions/Gone@Example.com")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(store.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["address"], "gone@example.com");
    assert_eq!(json["reason"], "bounced");
    assert_eq!(json["comments"], "550");

    let request = Request::builder()
        .uri("/v1/suppressions/other@example.com")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(store), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_health() {
    let store = Arc::new(InMemoryDoNotContactStore::new());
    let request = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(app(store), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"], "ok");
}
