pub mod analytics;
pub mod moderation;
