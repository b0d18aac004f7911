pub mod settings;
pub mod shared;
pub mod submission;
