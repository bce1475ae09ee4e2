//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证与用户管理接口
//! - [`bookings`] - 预订接口 (顾客提交 + 员工管理)
//! - [`closed_days`] - 闭店日管理接口

pub mod auth;
pub mod bookings;
pub mod closed_days;
pub mod health;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(auth::router())
        .merge(health::router())
        // Booking domain APIs
        .merge(bookings::router())
        .merge(closed_days::router())
}
