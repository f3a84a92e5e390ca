// 数据库模块
// 包含管理员实体定义和存储实现

use async_trait::async_trait;

pub mod memory;
pub mod models;
pub mod repositories;

pub use memory::MemoryAdminStore;
pub use models::admin::{AdminEntity, AdminSummary, NewAdmin, ProfileUpdate};
pub use repositories::admin::PgAdminStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// 管理员账户存储
///
/// 查询返回 `Option`/`Vec`，没有数据不是错误；写操作返回受影响的行数，
/// 由调用方判断 0 行是否算失败。
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminEntity>, StoreError>;

    async fn find_by_id(&self, admin_id: i64) -> Result<Option<AdminEntity>, StoreError>;

    /// 插入账户和角色关联，返回新账户 id
    async fn create_admin(&self, admin: &NewAdmin, role_id: i32) -> Result<i64, StoreError>;

    /// 登录次数加一并记录登录时间
    async fn record_login(&self, admin_id: i64) -> Result<u64, StoreError>;

    async fn find_role(&self, admin_id: i64) -> Result<Option<i32>, StoreError>;

    async fn role_exists(&self, role_id: i32) -> Result<bool, StoreError>;

    async fn list_admins(&self) -> Result<Vec<AdminSummary>, StoreError>;

    async fn delete_admin(&self, admin_id: i64) -> Result<u64, StoreError>;

    async fn update_profile(&self, admin_id: i64, profile: &ProfileUpdate) -> Result<u64, StoreError>;

    async fn update_profile_and_role(
        &self,
        admin_id: i64,
        profile: &ProfileUpdate,
        role_id: i32,
    ) -> Result<u64, StoreError>;
}
