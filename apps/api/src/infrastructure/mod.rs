pub mod auth;
pub mod database;
pub mod imaging;
pub mod repositories;
pub mod security;
pub mod storage;
