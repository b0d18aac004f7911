pub mod dto;
pub mod use_case;

pub use dto::{SubmitPhotoRequest, SubmitPhotoResponse};
pub use use_case::{IngestionOptions, SubmitPhotoUseCase};
