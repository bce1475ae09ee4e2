//! Closed Day API 模块
//!
//! 公开的闭店日列表；管理员标记/取消闭店日。

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/closed-days", routes())
}

fn routes() -> Router<ServerState> {
    // 列表是公共路由 (require_auth 白名单放行 GET /api/closed-days)
    let public_routes = Router::new().route("/", get(handler::list));

    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{date}", delete(handler::delete))
        .layer(middleware::from_fn(require_role("admin")));

    public_routes.merge(admin_routes)
}
