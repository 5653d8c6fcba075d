pub mod moderation_dto;

pub use moderation_dto::{
    ImageSubmission, ModerateImageForm, ModerateTextDto, ModerationOutcomeDto,
};
