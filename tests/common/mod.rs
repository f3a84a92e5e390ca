use std::sync::Arc;

use admin_backend::{
    AppState,
    api::operations::admin::ensure_super_admin,
    auth::guard::ROLE_SUPER_ADMIN,
    config::{Config, DEFAULT_AVATAR},
    database::MemoryAdminStore,
    router::create_router,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryAdminStore>,
    pub state: AppState,
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/admin".into(),
        redis_url: None,
        jwt_secret: SECRET.into(),
        jwt_expiration_secs: 4 * 3600,
        rate_limit_window_secs: 60,
        rate_limit_requests: 100,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_uri: "/api/admin".into(),
        elevated_role: ROLE_SUPER_ADMIN,
        bcrypt_cost: 4,
        default_avatar: DEFAULT_AVATAR.into(),
        super_admin: None,
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryAdminStore::new());
        let state = AppState::new(store.clone(), test_config());
        let router = create_router(state.clone(), None);
        Self { router, store, state }
    }

    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/api/admin{}", path))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// 注册并返回 (id, token)
    pub async fn register(&self, username: &str, password: &str) -> (i64, String) {
        let (status, body) = self
            .post(
                "/register",
                serde_json::json!({ "username": username, "password": password }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["code"], 0, "{}", body);
        let data = &body["resp_data"];
        (
            data["id"].as_i64().unwrap(),
            data["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/login",
            serde_json::json!({ "username": username, "password": password }),
            None,
        )
        .await
    }

    /// 创建超级管理员并登录，返回令牌
    pub async fn super_admin_token(&self) -> String {
        ensure_super_admin(&self.state, "root", "rootpass").await.unwrap();
        let (_, body) = self.login("root", "rootpass").await;
        body["resp_data"]["token"].as_str().unwrap().to_string()
    }
}
