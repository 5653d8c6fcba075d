use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::AnalyticsService;

/// Create routes for the analytics feature
pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/analytics/summary", get(handlers::analytics_summary))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use sqlx::PgPool;

    // Lazy pool: no connection is made until a query runs, and the 400
    // path never reaches the database.
    fn test_server() -> TestServer {
        let pool = PgPool::connect_lazy("postgres://localhost/moderation_test").unwrap();
        let service = Arc::new(AnalyticsService::new(pool));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_user_param_is_rejected() {
        let server = test_server();

        let res = server.get("/analytics/summary").await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

        let body: Value = res.json();
        assert_eq!(body["detail"], "Missing user query parameter");
    }

    #[tokio::test]
    async fn test_empty_user_param_is_rejected() {
        let server = test_server();

        let res = server
            .get("/analytics/summary")
            .add_query_param("user", "")
            .await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    }
}
