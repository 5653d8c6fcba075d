use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::moderation::dtos::ModerationOutcomeDto;
use crate::features::moderation::models::{ContentKind, ModerationRequest, RequestStatus};
use crate::features::moderation::services::classification_service::{
    ClassificationOutcome, SubmittedContent,
};
use crate::features::moderation::services::{ClassificationService, NotificationService};
use crate::shared::fingerprint::{sha256_hex, sha256_text};

/// Coordinates one submission end to end: request row, classification,
/// result row, status transition, and (for unsafe content) alert dispatch.
///
/// The request row is made durable first so that every submission leaves an
/// audit trail. The result row and the `completed` transition form one
/// atomic unit; if that unit fails, the request is driven to `failed`
/// (best-effort) and the storage error propagates to the caller.
pub struct ModerationService {
    pool: PgPool,
    classifier: Arc<ClassificationService>,
    notifier: Arc<NotificationService>,
}

impl ModerationService {
    pub fn new(
        pool: PgPool,
        classifier: Arc<ClassificationService>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            pool,
            classifier,
            notifier,
        }
    }

    pub async fn moderate_text(&self, email: &str, text: &str) -> Result<ModerationOutcomeDto> {
        let content_hash = sha256_text(text);
        self.moderate(
            email,
            ContentKind::Text,
            SubmittedContent::Text(text),
            content_hash,
        )
        .await
    }

    pub async fn moderate_image(&self, email: &str, image: &[u8]) -> Result<ModerationOutcomeDto> {
        let content_hash = sha256_hex(image);
        self.moderate(
            email,
            ContentKind::Image,
            SubmittedContent::Image(image),
            content_hash,
        )
        .await
    }

    async fn moderate(
        &self,
        email: &str,
        kind: ContentKind,
        content: SubmittedContent<'_>,
        content_hash: String,
    ) -> Result<ModerationOutcomeDto> {
        let request = self.create_request(email, kind, &content_hash).await?;

        // Classification never fails; provider errors degrade to the
        // heuristic inside the orchestrator.
        let outcome = self.classifier.classify(email, content).await;

        if let Err(e) = self.complete_request(request.id, &outcome).await {
            self.mark_failed(request.id).await;
            return Err(e);
        }

        tracing::info!(
            "Moderation completed: request_id={}, kind={}, label={}, origin={:?}",
            request.id,
            kind.as_str(),
            outcome.label,
            outcome.origin
        );

        // Alerts fire only after the record is durable and never affect
        // the response.
        if !outcome.is_safe() {
            self.notifier
                .dispatch_alerts(&request, &outcome.label, outcome.confidence)
                .await;
        }

        Ok(ModerationOutcomeDto {
            request_id: request.id,
            classification: outcome.label,
            confidence: outcome.confidence,
            reasoning: outcome.reasoning,
        })
    }

    async fn create_request(
        &self,
        email: &str,
        kind: ContentKind,
        content_hash: &str,
    ) -> Result<ModerationRequest> {
        let request = sqlx::query_as::<_, ModerationRequest>(
            r#"
            INSERT INTO moderation_requests (user_email, content_kind, content_hash, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_email, content_kind, content_hash, status, created_at
            "#,
        )
        .bind(email)
        .bind(kind)
        .bind(content_hash)
        .bind(RequestStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create moderation request: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(request)
    }

    /// Result row + `completed` transition as one atomic unit
    async fn complete_request(
        &self,
        request_id: i64,
        outcome: &ClassificationOutcome,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO moderation_results
                (request_id, classification, confidence, reasoning, llm_response)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request_id)
        .bind(&outcome.label)
        .bind(outcome.confidence)
        .bind(&outcome.reasoning)
        .bind(&outcome.raw_response)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE moderation_requests SET status = $2 WHERE id = $1")
            .bind(request_id)
            .bind(RequestStatus::Completed)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Best-effort terminal transition when the result could not be
    /// persisted. Errors here are logged and dropped: the original storage
    /// error is the one surfaced to the caller.
    async fn mark_failed(&self, request_id: i64) {
        let result = sqlx::query("UPDATE moderation_requests SET status = $2 WHERE id = $1")
            .bind(request_id)
            .bind(RequestStatus::Failed)
            .execute(&self.pool)
            .await;

        if let Err(e) = result {
            tracing::error!(
                "Failed to mark request {} as failed: {:?}",
                request_id,
                e
            );
        }
    }
}
