//! Shared types for the Snug booking backend
//!
//! Common types used across crates: request/response DTOs for the HTTP API,
//! and the unified error system (error codes, `AppError`, `ApiResponse`).

pub mod booking;
pub mod client;
pub mod error;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
