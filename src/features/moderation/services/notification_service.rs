use reqwest::StatusCode;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::NotificationConfig;
use crate::features::moderation::models::{ContentKind, ModerationRequest, NotificationChannel};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";
const SLACK_TIMEOUT: Duration = Duration::from_secs(10);
const EMAIL_TIMEOUT: Duration = Duration::from_secs(15);

/// Typed failure modes of one delivery attempt. Converted into a failed
/// `DeliveryOutcome` at a single boundary; never propagated to callers.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{0}")]
    MissingCredential(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

/// Result of one channel attempt, recorded verbatim in the log row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    pub details: String,
}

impl DeliveryOutcome {
    fn sent() -> Self {
        Self {
            delivered: true,
            details: "sent".to_string(),
        }
    }

    fn failed(details: String) -> Self {
        Self {
            delivered: false,
            details,
        }
    }

    pub fn status_str(&self) -> &'static str {
        if self.delivered {
            "sent"
        } else {
            "failed"
        }
    }
}

/// Best-effort alert dispatcher for unsafe classifications.
///
/// Runs strictly after the classification record is durable. Channels are
/// attempted sequentially (Slack, then email) and independently; each
/// attempt yields exactly one notification_logs row, and no failure here
/// ever reaches the HTTP caller.
pub struct NotificationService {
    pool: PgPool,
    http: reqwest::Client,
    config: NotificationConfig,
    email_api_url: String,
}

impl NotificationService {
    pub fn new(pool: PgPool, config: NotificationConfig) -> Self {
        Self {
            pool,
            http: reqwest::Client::new(),
            config,
            email_api_url: BREVO_SEND_URL.to_string(),
        }
    }

    /// Point the email client at a different endpoint (proxies, tests)
    #[allow(dead_code)]
    pub fn with_email_api_url(mut self, url: impl Into<String>) -> Self {
        self.email_api_url = url.into();
        self
    }

    /// Fire both alert channels for a flagged request and log each outcome.
    pub async fn dispatch_alerts(&self, request: &ModerationRequest, label: &str, confidence: f64) {
        let message = alert_message(request, label, confidence);
        let slack_outcome = self.send_slack(&message).await;
        self.record_log(request.id, NotificationChannel::Slack, &slack_outcome)
            .await;

        let subject = alert_subject(request.content_kind, label);
        let html = alert_html_body(request.content_kind, label, confidence);
        let email_outcome = self
            .send_email(&request.user_email, &subject, &html)
            .await;
        self.record_log(request.id, NotificationChannel::Email, &email_outcome)
            .await;
    }

    pub async fn send_slack(&self, text: &str) -> DeliveryOutcome {
        match self.attempt_slack(text).await {
            Ok(()) => DeliveryOutcome::sent(),
            Err(e) => {
                tracing::warn!("Slack alert delivery failed: {}", e);
                DeliveryOutcome::failed(e.to_string())
            }
        }
    }

    pub async fn send_email(&self, to_email: &str, subject: &str, html: &str) -> DeliveryOutcome {
        match self.attempt_email(to_email, subject, html).await {
            Ok(()) => DeliveryOutcome::sent(),
            Err(e) => {
                tracing::warn!("Email alert delivery failed: {}", e);
                DeliveryOutcome::failed(e.to_string())
            }
        }
    }

    async fn attempt_slack(&self, text: &str) -> Result<(), NotificationError> {
        let webhook = self
            .config
            .slack_webhook_url
            .as_ref()
            .ok_or(NotificationError::MissingCredential(
                "SLACK_WEBHOOK_URL not set",
            ))?;

        let resp = self
            .http
            .post(webhook)
            .json(&serde_json::json!({"text": text}))
            .timeout(SLACK_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotificationError::UnexpectedStatus { status, body });
        }
        Ok(())
    }

    async fn attempt_email(
        &self,
        to_email: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), NotificationError> {
        let api_key = self
            .config
            .brevo_api_key
            .as_ref()
            .ok_or(NotificationError::MissingCredential("BREVO_API_KEY not set"))?;

        let payload = serde_json::json!({
            "sender": {
                "name": self.config.brevo_sender_name,
                "email": self.config.brevo_sender_email,
            },
            "to": [{"email": to_email}],
            "subject": subject,
            "htmlContent": html,
        });

        let resp = self
            .http
            .post(&self.email_api_url)
            .header("accept", "application/json")
            .header("api-key", api_key)
            .json(&payload)
            .timeout(EMAIL_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotificationError::UnexpectedStatus { status, body });
        }
        Ok(())
    }

    /// One durable log row per channel attempt. An insert failure is logged
    /// and swallowed: the classification record is already final.
    async fn record_log(
        &self,
        request_id: i64,
        channel: NotificationChannel,
        outcome: &DeliveryOutcome,
    ) {
        let result = sqlx::query(
            r#"
            INSERT INTO notification_logs (request_id, channel, status, details)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request_id)
        .bind(channel)
        .bind(outcome.status_str())
        .bind(&outcome.details)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::error!(
                "Failed to record notification log (request_id={}, channel={:?}): {:?}",
                request_id,
                channel,
                e
            );
        }
    }
}

/// Chat alert line, e.g.
/// `[Content Alert] a@b.c submitted spam content (conf 0.85). Request #7`
pub fn alert_message(request: &ModerationRequest, label: &str, confidence: f64) -> String {
    match request.content_kind {
        ContentKind::Text => format!(
            "[Content Alert] {} submitted {} content (conf {:.2}). Request #{}",
            request.user_email, label, confidence, request.id
        ),
        ContentKind::Image => format!(
            "[Image Alert] {} submitted {} image (conf {:.2}). Request #{}",
            request.user_email, label, confidence, request.id
        ),
    }
}

pub fn alert_subject(kind: ContentKind, label: &str) -> String {
    match kind {
        ContentKind::Text => format!("Content Moderation Alert: {}", label),
        ContentKind::Image => format!("Image Moderation Alert: {}", label),
    }
}

pub fn alert_html_body(kind: ContentKind, label: &str, confidence: f64) -> String {
    match kind {
        ContentKind::Text => format!(
            "<p>Your recent submission was flagged: <b>{}</b> (confidence {:.2}).</p>",
            label, confidence
        ),
        ContentKind::Image => format!(
            "<p>Your recent image was flagged: <b>{}</b> (confidence {:.2}).</p>",
            label, confidence
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::features::moderation::models::RequestStatus;

    fn request(kind: ContentKind) -> ModerationRequest {
        ModerationRequest {
            id: 42,
            user_email: "user@example.com".to_string(),
            content_kind: kind,
            content_hash: "0".repeat(64),
            status: RequestStatus::Completed,
            created_at: Utc::now(),
        }
    }

    fn unconfigured_service() -> NotificationService {
        let config = NotificationConfig {
            slack_webhook_url: None,
            brevo_api_key: None,
            brevo_sender_name: "Content Moderation".to_string(),
            brevo_sender_email: "no-reply@moderation.local".to_string(),
        };
        // The pool is lazy: no connection is made until a query runs, and
        // these tests never touch the log table.
        let pool = PgPool::connect_lazy("postgres://localhost/moderation_test").unwrap();
        NotificationService::new(pool, config)
    }

    #[test]
    fn test_alert_message_for_text() {
        let msg = alert_message(&request(ContentKind::Text), "spam", 0.85);
        assert_eq!(
            msg,
            "[Content Alert] user@example.com submitted spam content (conf 0.85). Request #42"
        );
    }

    #[test]
    fn test_alert_message_for_image() {
        let msg = alert_message(&request(ContentKind::Image), "toxic", 0.7);
        assert_eq!(
            msg,
            "[Image Alert] user@example.com submitted toxic image (conf 0.70). Request #42"
        );
    }

    #[test]
    fn test_alert_subject_and_body() {
        assert_eq!(
            alert_subject(ContentKind::Text, "harassment"),
            "Content Moderation Alert: harassment"
        );
        assert_eq!(
            alert_subject(ContentKind::Image, "toxic"),
            "Image Moderation Alert: toxic"
        );
        assert_eq!(
            alert_html_body(ContentKind::Text, "spam", 0.851),
            "<p>Your recent submission was flagged: <b>spam</b> (confidence 0.85).</p>"
        );
    }

    #[tokio::test]
    async fn test_missing_webhook_is_a_failed_outcome() {
        let service = unconfigured_service();
        let outcome = service.send_slack("hello").await;
        assert!(!outcome.delivered);
        assert_eq!(outcome.status_str(), "failed");
        assert_eq!(outcome.details, "SLACK_WEBHOOK_URL not set");
    }

    #[tokio::test]
    async fn test_missing_email_key_is_a_failed_outcome() {
        let service = unconfigured_service();
        let outcome = service
            .send_email("user@example.com", "subject", "<p>body</p>")
            .await;
        assert!(!outcome.delivered);
        assert_eq!(outcome.details, "BREVO_API_KEY not set");
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_a_failed_outcome() {
        let mut service = unconfigured_service();
        service.config.slack_webhook_url = Some("http://127.0.0.1:9/webhook".to_string());

        let outcome = service.send_slack("hello").await;
        assert!(!outcome.delivered);
        assert!(outcome.details.contains("transport error"));
    }
}
