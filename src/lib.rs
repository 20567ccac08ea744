//! Edgelink - short links with click statistics, plus stateless encrypted links
//!
//! # Architecture
//! - `api`: route table, handlers, bearer-token checks and CORS
//! - `services`: short link business logic
//! - `storage`: key-value store abstraction (Redis, in-memory)
//! - `crypto`: AES-GCM link cipher
//! - `config`: configuration loading and CLI arguments
//! - `runtime`: startup wiring and the HTTP server
//! - `system`: logging
//! - `utils`: short codes, URL validation, base64 helpers

pub mod api;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
