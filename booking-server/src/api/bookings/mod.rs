//! Booking API 模块
//!
//! 顾客提交预订请求 (公共路由)；员工查看、编辑与到店管理。

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    // 顾客提交预订 (require_auth 白名单放行 POST /api/bookings)
    let public_routes = Router::new().route("/", post(handler::create));

    // 登录用户查看自己邮箱下的预订
    let account_routes = Router::new().route("/", get(handler::list_mine));

    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/arrived", put(handler::set_arrived))
        .layer(middleware::from_fn(require_role("admin")));

    public_routes.merge(account_routes).merge(admin_routes)
}
