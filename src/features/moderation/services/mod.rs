pub mod classification_service;
pub mod heuristic;
pub mod moderation_service;
pub mod notification_service;

pub use classification_service::ClassificationService;
pub use moderation_service::ModerationService;
pub use notification_service::NotificationService;
