use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// Kind of submitted content
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "content_kind", rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
        }
    }
}

/// Lifecycle of a moderation request.
///
/// A request starts `Pending` and moves to `Completed` together with its
/// result row. `Failed` is the terminal state when the result could not be
/// persisted after the request row was already durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
    Failed,
}

/// Alert transport channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_channel", rename_all = "lowercase")]
pub enum NotificationChannel {
    Slack,
    Email,
}

/// Database model for a single content submission
#[derive(Debug, Clone, FromRow)]
pub struct ModerationRequest {
    pub id: i64,
    pub user_email: String,
    pub content_kind: ContentKind,
    pub content_hash: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Database model for a classification result (at most one per request)
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct ModerationResult {
    pub id: i64,
    pub request_id: i64,
    pub classification: String,
    pub confidence: f64,
    pub reasoning: String,
    pub llm_response: Value,
}

/// Database model for one delivery attempt on one alert channel
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct NotificationLog {
    pub id: i64,
    pub request_id: i64,
    pub channel: NotificationChannel,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub details: String,
}
