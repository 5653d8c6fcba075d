use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::moderation::handlers;
use crate::features::moderation::services::ModerationService;

/// Create routes for the moderation feature
pub fn routes(service: Arc<ModerationService>) -> Router {
    Router::new()
        .route("/moderate/text", post(handlers::moderate_text))
        .route("/moderate/image", post(handlers::moderate_image))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{LlmConfig, NotificationConfig};
    use crate::features::moderation::services::{ClassificationService, NotificationService};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    // Lazy pool: validation failures are rejected before any query runs,
    // so these tests never need a live database.
    fn test_server() -> TestServer {
        let pool = PgPool::connect_lazy("postgres://localhost/moderation_test").unwrap();
        let classifier = Arc::new(ClassificationService::new(&LlmConfig {
            provider: "gemini".to_string(),
            openai_api_key: None,
            google_api_key: None,
            gemini_model: "gemini-1.5-pro".to_string(),
        }));
        let notifier = Arc::new(NotificationService::new(
            pool.clone(),
            NotificationConfig {
                slack_webhook_url: None,
                brevo_api_key: None,
                brevo_sender_name: "Content Moderation".to_string(),
                brevo_sender_email: "no-reply@moderation.local".to_string(),
            },
        ));
        let service = Arc::new(ModerationService::new(pool, classifier, notifier));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let server = test_server();

        let res = server
            .post("/moderate/text")
            .json(&json!({ "email": "not-an-email", "text": "hello" }))
            .await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

        let body: Value = res.json();
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let server = test_server();

        let res = server
            .post("/moderate/text")
            .json(&json!({ "email": "user@example.com", "text": "" }))
            .await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_rejected() {
        let server = test_server();

        let res = server
            .post("/moderate/text")
            .text("{not json")
            .content_type("application/json")
            .await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    }
}
