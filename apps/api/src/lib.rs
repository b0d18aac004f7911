//! Moderated guest photo gallery API.
//!
//! Guests upload photos that are validated, normalized to JPEG display and
//! thumbnail variants, stored privately in object storage and queued as
//! `pending`. Administrators approve, reject, re-caption, delete and export
//! submissions; approved photos are served through keyset-paginated listings
//! with short-lived signed URLs.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
