pub mod r2_storage_service;
pub mod traits;

pub use r2_storage_service::R2StorageService;
pub use traits::{Buckets, StorageService};
