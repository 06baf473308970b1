pub mod media;
pub mod moderation;
