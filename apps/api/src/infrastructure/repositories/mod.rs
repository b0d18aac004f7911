pub mod sqlx_admin_directory;
pub mod sqlx_settings_repository;
pub mod sqlx_submission_repository;

pub use sqlx_admin_directory::SqlxAdminDirectory;
pub use sqlx_settings_repository::SqlxSettingsRepository;
pub use sqlx_submission_repository::SqlxSubmissionRepository;
