pub mod export;
pub mod list_submissions;
pub mod moderation;
pub mod submit_photo;
