use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// 管理员数据库实体
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminEntity {
    pub admin_id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub fullname: Option<String>,
    pub sex: Option<String>,
    pub tel: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub login_count: i64,
    pub login_time: Option<DateTime<Utc>>,
    pub create_time: DateTime<Utc>,
}

/// 管理员列表项，附带当前角色
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminSummary {
    pub admin_id: i64,
    pub username: String,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub sex: Option<String>,
    pub avatar: Option<String>,
    pub tel: Option<String>,
    pub login_time: Option<DateTime<Utc>>,
    pub login_count: i64,
    pub role: Option<i32>,
    pub role_name: Option<String>,
}

/// 待插入的管理员
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub fullname: Option<String>,
    pub sex: Option<String>,
    pub tel: Option<String>,
    pub avatar: Option<String>,
}

/// 可修改的资料字段，`None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub sex: Option<String>,
    pub avatar: Option<String>,
    pub tel: Option<String>,
    pub email: Option<String>,
}
