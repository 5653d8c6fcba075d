pub mod moderation_handler;

pub use moderation_handler::{moderate_image, moderate_text};
