use std::env;
use std::time::Duration;

use crate::auth::guard::ROLE_SUPER_ADMIN;

pub const DEFAULT_AVATAR: &str = "/images/avatar/default.jpg";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub elevated_role: i32,
    pub bcrypt_cost: u32,
    pub default_avatar: String,
    pub super_admin: Option<SuperAdminSeed>,
}

/// 启动时创建的超级管理员账号
#[derive(Debug, Clone)]
pub struct SuperAdminSeed {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// 从任意变量来源构建配置，`from_env` 使用进程环境变量
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let jwt_expiration = match vars.optional("JWT_EXPIRATION") {
            Some(value) => parse_hours(&value).ok_or(ConfigError::Invalid {
                name: "JWT_EXPIRATION",
                value,
            })?,
            None => 4,
        };

        let super_admin = match (
            vars.optional("SUPER_ADMIN_USERNAME"),
            vars.optional("SUPER_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(SuperAdminSeed { username, password }),
            _ => None,
        };

        Ok(Config {
            database_url: vars.required("DATABASE_URL")?,
            redis_url: vars.optional("REDIS_URL"),
            jwt_secret: vars.required("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            rate_limit_window_secs: vars.parsed("RATE_LIMIT_WINDOW", 60)?,
            rate_limit_requests: vars.parsed("RATE_LIMIT_REQUESTS", 100)?,
            server_host: vars.optional("SERVER_HOST").unwrap_or_else(|| "::".to_string()),
            server_port: vars.parsed("SERVER_PORT", 3000)?,
            api_base_uri: vars
                .optional("API_BASE_URI")
                .unwrap_or_else(|| "/api/admin".to_string()),
            elevated_role: vars.parsed("ELEVATED_ROLE", ROLE_SUPER_ADMIN)?,
            bcrypt_cost: vars.parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            default_avatar: vars
                .optional("DEFAULT_AVATAR")
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            super_admin,
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    // 空字符串视为未设置
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }
}

/// 解析 "4h" 或 "4" 形式的小时数
fn parse_hours(value: &str) -> Option<u64> {
    let value = value.trim();
    value
        .strip_suffix('h')
        .unwrap_or(value)
        .parse::<u64>()
        .ok()
        .filter(|h| *h > 0)
}
