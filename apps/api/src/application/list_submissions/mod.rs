pub mod dto;
pub mod use_case;

pub use use_case::{ListSubmissionsUseCase, LISTING_URL_TTL};
