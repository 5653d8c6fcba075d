pub mod moderation;

pub use moderation::{
    ContentKind, ModerationRequest, ModerationResult, NotificationChannel, NotificationLog,
    RequestStatus,
};
