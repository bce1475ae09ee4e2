//! Auth API 模块
//!
//! 登录、当前用户信息、密码修改以及管理员的用户管理接口。

mod handler;

use axum::{Router, middleware, routing::get, routing::patch, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    // 登录是公共路由 (require_auth 白名单放行)
    let public_routes = Router::new().route("/login", post(handler::login));

    let account_routes = Router::new()
        .route("/me", get(handler::me))
        .route("/account/change-password", post(handler::change_password));

    let admin_routes = Router::new()
        .route("/users", get(handler::list_users).post(handler::create_user))
        .route("/users/{id}/role", patch(handler::change_role))
        .layer(middleware::from_fn(require_role("admin")));

    public_routes.merge(account_routes).merge(admin_routes)
}
