//! Snug Booking Server - pub table-booking backend
//!
//! # 架构概述
//!
//! 本模块是 Booking Server 的主入口，提供以下核心功能：
//!
//! - **容量准入** (`capacity`): 时段占用检查，决定预订是否可接受
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **确认邮件** (`services/mailer`): 预订确认邮件投递
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证、角色检查
//! ├── capacity/      # 容量准入检查器 (核心算法)
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 确认邮件投递
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod capacity;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use capacity::{AdmissionDecision, CapacityChecker, SlotGrid};
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv, 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), None, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____
  / ___/____  __  ______ _
  \__ \/ __ \/ / / / __ `/
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\__,_/\__, /
                 /____/
    "#
    );
}
