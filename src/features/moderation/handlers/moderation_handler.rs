use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::moderation::dtos::{
    ImageSubmission, ModerateImageForm, ModerateTextDto, ModerationOutcomeDto,
};
use crate::features::moderation::services::ModerationService;

/// Submit text for moderation
///
/// Classifies the text via the configured LLM provider (with a local
/// heuristic fallback), persists the result and fires alerts when the
/// content is flagged unsafe.
#[utoipa::path(
    post,
    path = "/moderate/text",
    request_body = ModerateTextDto,
    responses(
        (status = 200, description = "Content classified", body = ModerationOutcomeDto),
        (status = 400, description = "Validation error")
    ),
    tag = "moderation"
)]
pub async fn moderate_text(
    State(service): State<Arc<ModerationService>>,
    AppJson(dto): AppJson<ModerateTextDto>,
) -> Result<Json<ModerationOutcomeDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service.moderate_text(&dto.email, &dto.text).await?;
    Ok(Json(outcome))
}

/// Submit an image for moderation
///
/// Accepts multipart/form-data with:
/// - `email`: submitter email (required)
/// - `image`: binary image file (required)
#[utoipa::path(
    post,
    path = "/moderate/image",
    request_body(
        content = ModerateImageForm,
        content_type = "multipart/form-data",
        description = "Image moderation form with submitter email and image file",
    ),
    responses(
        (status = 200, description = "Content classified", body = ModerationOutcomeDto),
        (status = 400, description = "Missing field or validation error")
    ),
    tag = "moderation"
)]
pub async fn moderate_image(
    State(service): State<Arc<ModerationService>>,
    mut multipart: Multipart,
) -> Result<Json<ModerationOutcomeDto>> {
    let mut email: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "email" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read email field: {}", e))
                })?;
                email = Some(text);
            }
            "image" => {
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;
                image = Some(data.to_vec());
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let email = email.ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;
    let image = image.ok_or_else(|| AppError::BadRequest("Image file is required".to_string()))?;

    if image.is_empty() {
        return Err(AppError::BadRequest("Image file is empty".to_string()));
    }

    ImageSubmission {
        email: email.clone(),
    }
    .validate()
    .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service.moderate_image(&email, &image).await?;
    Ok(Json(outcome))
}
