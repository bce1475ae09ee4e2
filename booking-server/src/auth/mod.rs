//! 认证模块 - JWT 认证与角色检查
//!
//! # 组件
//!
//! - [`JwtService`] - 令牌生成与验证
//! - [`CurrentUser`] - 请求上下文中的已认证用户
//! - [`require_auth`] - 路由级认证中间件 (带公共路由白名单)
//! - [`require_role`] - 角色检查中间件工厂

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};
