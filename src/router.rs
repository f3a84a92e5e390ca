use std::sync::Arc;

use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    api::handlers::admin,
    middleware::{RateLimiter, auth_middleware, log_errors, rate_limit},
};

// 无需令牌的路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(admin::register))
        .route("/login", post(admin::login))
}

// 需要令牌的路由，权限由各操作自行判断
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/list", post(admin::list))
        .route("/del", post(admin::delete))
        .route("/info", post(admin::info))
        .route("/update", post(admin::update))
        .route("/account", post(admin::update_account))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// 创建主路由
pub fn create_router(state: AppState, rate_limiter: Option<Arc<RateLimiter>>) -> Router {
    let router = Router::new().nest(
        &state.config.api_base_uri,
        Router::new()
            .merge(public_routes())
            .merge(protected_routes(&state)),
    );

    let router = router.layer(axum::middleware::from_fn(log_errors));

    let router = match rate_limiter {
        Some(limiter) => router.layer(axum::middleware::from_fn_with_state(limiter, rate_limit)),
        None => router,
    };

    // 开发模式下允许所有来源
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
