use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for the analytics summary endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// Email of the user whose submissions to aggregate
    pub user: Option<String>,
}

/// Label counts for one user across all historical results.
///
/// Always contains the four canonical labels (zero-seeded); any other label
/// encountered in the data extends the map.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummaryDto {
    pub user: String,
    pub counts: BTreeMap<String, i64>,
}
