use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::AnalyticsSummaryDto;
use crate::shared::constants::CANONICAL_LABELS;

#[derive(Debug, sqlx::FromRow)]
struct LabelCount {
    classification: String,
    total: i64,
}

/// Read-only aggregation over a user's moderation results
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tally classification labels across all of a user's results
    pub async fn summary_for_user(&self, email: &str) -> Result<AnalyticsSummaryDto> {
        let rows = sqlx::query_as::<_, LabelCount>(
            r#"
            SELECT res.classification, COUNT(*) AS total
            FROM moderation_results res
            JOIN moderation_requests req ON req.id = res.request_id
            WHERE req.user_email = $1
            GROUP BY res.classification
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate results for {}: {:?}", email, e);
            AppError::Database(e)
        })?;

        Ok(AnalyticsSummaryDto {
            user: email.to_string(),
            counts: tally(rows.into_iter().map(|r| (r.classification, r.total))),
        })
    }
}

/// Seed the four canonical labels at zero, then fold in observed counts.
/// Labels outside the canonical set extend the map.
fn tally(rows: impl Iterator<Item = (String, i64)>) -> BTreeMap<String, i64> {
    let mut counts: BTreeMap<String, i64> = CANONICAL_LABELS
        .iter()
        .map(|label| (label.to_string(), 0))
        .collect();

    for (label, total) in rows {
        *counts.entry(label).or_insert(0) += total;
    }

    counts
}
