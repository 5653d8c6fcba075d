use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for text moderation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ModerateTextDto {
    /// Submitter email, used for audit and alerting
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// The text to classify
    #[validate(length(min = 1, max = 20000, message = "Text must be 1-20000 characters"))]
    pub text: String,
}

/// Multipart form for image moderation (schema only; fields are read from
/// the multipart stream in the handler)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ModerateImageForm {
    /// Submitter email, used for audit and alerting
    pub email: String,

    /// Raw image file
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Validation shim for the multipart email field
#[derive(Debug, Clone, Validate)]
pub struct ImageSubmission {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Classification outcome returned by both moderation endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModerationOutcomeDto {
    pub request_id: i64,
    pub classification: String,
    pub confidence: f64,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_text_dto() {
        let dto = ModerateTextDto {
            email: "user@example.com".to_string(),
            text: "hello world".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let dto = ModerateTextDto {
            email: "not-an-email".to_string(),
            text: "hello".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let dto = ModerateTextDto {
            email: "user@example.com".to_string(),
            text: String::new(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_oversized_text_is_rejected() {
        let dto = ModerateTextDto {
            email: "user@example.com".to_string(),
            text: "a".repeat(20001),
        };
        assert!(dto.validate().is_err());

        let at_limit = ModerateTextDto {
            email: "user@example.com".to_string(),
            text: "a".repeat(20000),
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_image_submission_email_validation() {
        assert!(ImageSubmission {
            email: "user@example.com".to_string()
        }
        .validate()
        .is_ok());
        assert!(ImageSubmission {
            email: "bogus".to_string()
        }
        .validate()
        .is_err());
    }
}
