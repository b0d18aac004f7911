pub mod use_case;

pub use use_case::{ExportUseCase, EXPORT_HEADER, EXPORT_URL_TTL};
