use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::{AnalyticsQuery, AnalyticsSummaryDto};
use crate::features::analytics::services::AnalyticsService;

/// Per-user classification summary
///
/// Tallies the classification labels of all historical results for the
/// given user, seeded with the four canonical labels at zero.
#[utoipa::path(
    get,
    path = "/analytics/summary",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Label counts for the user", body = AnalyticsSummaryDto),
        (status = 400, description = "Missing user query parameter")
    ),
    tag = "analytics"
)]
pub async fn analytics_summary(
    State(service): State<Arc<AnalyticsService>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummaryDto>> {
    let user = query
        .user
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing user query parameter".to_string()))?;

    let summary = service.summary_for_user(&user).await?;
    Ok(Json(summary))
}
