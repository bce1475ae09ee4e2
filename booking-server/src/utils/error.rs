//! 统一错误处理
//!
//! 错误类型定义在 `shared::error` (服务端与客户端共用)；
//! 这里统一 re-export，服务端代码一律从 `crate::utils` 引入。

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
