//! Business logic layer

pub mod link_service;

pub use link_service::{LinkService, MAX_CODE_ATTEMPTS, ShortenedLink};
