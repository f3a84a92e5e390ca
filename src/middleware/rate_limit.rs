use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use async_trait::async_trait;
use redis::AsyncCommands;

use crate::{
    config::Config,
    utils::{error_codes, error_to_api_response},
};

/// 固定窗口计数器，返回本窗口内的累计次数
#[async_trait]
pub trait WindowCounter: Send + Sync {
    async fn increment(&self, key: &str, window_secs: u64) -> redis::RedisResult<i64>;
}

pub struct RedisCounter {
    client: redis::Client,
}

impl RedisCounter {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WindowCounter for RedisCounter {
    async fn increment(&self, key: &str, window_secs: u64) -> redis::RedisResult<i64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // 使用 Redis 的 INCR 和 EXPIRE 命令实现计数器
        let count: i64 = conn.incr(key, 1).await?;
        if count == 1 {
            let _: () = conn.expire(key, window_secs as i64).await?;
        }

        Ok(count)
    }
}

/// 按客户端 IP 的固定窗口限流
#[derive(Clone)]
pub struct RateLimiter {
    counter: Arc<dyn WindowCounter>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: Config) -> Self {
        Self::with_counter(Arc::new(RedisCounter::new(redis)), config)
    }

    pub fn with_counter(counter: Arc<dyn WindowCounter>, config: Config) -> Self {
        Self {
            counter,
            config: Arc::new(config),
        }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        let ip = client_ip(&req);
        let key = format!("rate_limit:{}", ip);
        let window = self.config.rate_limit_window().as_secs();

        match self.counter.increment(&key, window).await {
            Ok(count) if count > self.config.rate_limit_requests as i64 => {
                tracing::debug!("Rate limit exceeded for {}", ip);
                (
                    StatusCode::OK,
                    error_to_api_response::<()>(
                        error_codes::RATE_LIMIT,
                        format!("请求过于频繁，请在{}秒后重试", window),
                    ),
                )
                    .into_response()
            }
            Ok(_) => next.run(req).await,
            Err(e) => {
                // Redis 不可用时放行
                tracing::warn!("Rate limit check failed: {}", e);
                next.run(req).await
            }
        }
    }
}

/// 优先使用代理头中的 IP，其次是连接地址
fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use axum::{Router, middleware::from_fn_with_state, routing::post};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::guard::ROLE_SUPER_ADMIN;
    use crate::config::DEFAULT_AVATAR;

    #[derive(Default)]
    struct CountingWindow {
        hits: Mutex<HashMap<String, i64>>,
    }

    #[async_trait]
    impl WindowCounter for CountingWindow {
        async fn increment(&self, key: &str, _window_secs: u64) -> redis::RedisResult<i64> {
            let mut hits = self.hits.lock().unwrap();
            let count = hits.entry(key.to_string()).or_insert(0);
            *count += 1;
            Ok(*count)
        }
    }

    struct UnavailableWindow;

    #[async_trait]
    impl WindowCounter for UnavailableWindow {
        async fn increment(&self, _key: &str, _window_secs: u64) -> redis::RedisResult<i64> {
            Err(redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")))
        }
    }

    fn limited_config(requests: u32) -> Config {
        Config {
            database_url: "postgres://localhost/admin".into(),
            redis_url: None,
            jwt_secret: "secret".into(),
            jwt_expiration_secs: 3600,
            rate_limit_window_secs: 60,
            rate_limit_requests: requests,
            server_host: "::".into(),
            server_port: 3000,
            api_base_uri: "/api/admin".into(),
            elevated_role: ROLE_SUPER_ADMIN,
            bcrypt_cost: 4,
            default_avatar: DEFAULT_AVATAR.into(),
            super_admin: None,
        }
    }

    fn limited_router(counter: Arc<dyn WindowCounter>, requests: u32) -> Router {
        let limiter = Arc::new(RateLimiter::with_counter(counter, limited_config(requests)));
        Router::new()
            .route("/ping", post(|| async { "pong" }))
            .layer(from_fn_with_state(limiter, rate_limit))
    }

    async fn send(router: &Router, ip: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method("POST")
            .uri("/ping")
            .header("x-real-ip", ip)
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn requests_over_the_window_limit_get_rate_limit_code() {
        let router = limited_router(Arc::new(CountingWindow::default()), 2);

        assert_eq!(send(&router, "10.0.0.1").await.1, "pong");
        assert_eq!(send(&router, "10.0.0.1").await.1, "pong");

        let (status, body) = send(&router, "10.0.0.1").await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["code"], error_codes::RATE_LIMIT);
        assert!(body.get("resp_data").is_none());

        // 其他 IP 单独计数
        assert_eq!(send(&router, "10.0.0.2").await.1, "pong");
    }

    #[tokio::test]
    async fn counter_failures_let_requests_through() {
        let router = limited_router(Arc::new(UnavailableWindow), 0);

        let (status, body) = send(&router, "10.0.0.1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[test]
    fn prefers_forwarded_headers_over_connection() {
        let req = Request::builder()
            .header("x-forwarded-for", " 10.0.0.1, 10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "10.0.0.1");

        let req = Request::builder()
            .header("x-real-ip", "192.168.1.9")
            .header("x-forwarded-for", "10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "192.168.1.9");
    }

    #[test]
    fn falls_back_to_unknown_without_connection_info() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&req), "unknown");
    }
}
