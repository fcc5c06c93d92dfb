//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate catalog and store calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from transport and storage details.

pub mod fetch;
pub mod recipe_service;
pub mod write_pool;
