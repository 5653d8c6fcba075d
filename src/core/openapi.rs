use utoipa::{Modify, OpenApi};

use crate::core::error::ErrorBody;
use crate::features::analytics::{dtos as analytics_dtos, handlers as analytics_handlers};
use crate::features::moderation::{dtos as moderation_dtos, handlers as moderation_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Moderation
        moderation_handlers::moderation_handler::moderate_text,
        moderation_handlers::moderation_handler::moderate_image,
        // Analytics
        analytics_handlers::analytics_handler::analytics_summary,
    ),
    components(
        schemas(
            ErrorBody,
            // Moderation
            moderation_dtos::ModerateTextDto,
            moderation_dtos::ModerateImageForm,
            moderation_dtos::ModerationOutcomeDto,
            // Analytics
            analytics_dtos::AnalyticsSummaryDto,
        )
    ),
    tags(
        (name = "moderation", description = "Submit text or images for content classification"),
        (name = "analytics", description = "Per-user aggregation of past classifications"),
    ),
    info(
        title = "Moderation API",
        version = "0.1.0",
        description = "Content moderation pipeline: classification, persistence, alerting",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
