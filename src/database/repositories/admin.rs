use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{AdminEntity, AdminStore, AdminSummary, NewAdmin, ProfileUpdate, StoreError};

const ADMIN_COLUMNS: &str = r#"
    admin_id, username, password_hash, fullname, sex, tel, email, avatar,
    login_count, login_time, create_time
"#;

/// 基于 PostgreSQL 的管理员存储库
#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminEntity>, StoreError> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admin WHERE username = $1");
        let admin = sqlx::query_as::<_, AdminEntity>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    async fn find_by_id(&self, admin_id: i64) -> Result<Option<AdminEntity>, StoreError> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admin WHERE admin_id = $1");
        let admin = sqlx::query_as::<_, AdminEntity>(&sql)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    async fn create_admin(&self, admin: &NewAdmin, role_id: i32) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let admin_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO admin (username, password_hash, fullname, sex, tel, avatar, create_time)
            VALUES ($1, $2, $3, $4, $5, $6, CURRENT_TIMESTAMP)
            RETURNING admin_id
            "#,
        )
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(&admin.fullname)
        .bind(&admin.sex)
        .bind(&admin.tel)
        .bind(&admin.avatar)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO admin_role (admin_id, role_id) VALUES ($1, $2)")
            .bind(admin_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Created admin {} with role {}", admin_id, role_id);
        Ok(admin_id)
    }

    async fn record_login(&self, admin_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE admin
            SET login_count = login_count + 1, login_time = CURRENT_TIMESTAMP
            WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_role(&self, admin_id: i64) -> Result<Option<i32>, StoreError> {
        let role = sqlx::query_scalar::<_, i32>("SELECT role_id FROM admin_role WHERE admin_id = $1")
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    async fn role_exists(&self, role_id: i32) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM role WHERE role_id = $1)")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn list_admins(&self) -> Result<Vec<AdminSummary>, StoreError> {
        let admins = sqlx::query_as::<_, AdminSummary>(
            r#"
            SELECT
                a.admin_id, a.username, a.fullname, a.email, a.sex, a.avatar, a.tel,
                a.login_time, a.login_count,
                r.role_id AS role, r.role_name
            FROM admin AS a
            LEFT JOIN admin_role AS ar ON a.admin_id = ar.admin_id
            LEFT JOIN role AS r ON r.role_id = ar.role_id
            ORDER BY a.admin_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }

    async fn delete_admin(&self, admin_id: i64) -> Result<u64, StoreError> {
        // admin_role 通过外键级联删除
        let result = sqlx::query("DELETE FROM admin WHERE admin_id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_profile(&self, admin_id: i64, profile: &ProfileUpdate) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE admin
            SET fullname = COALESCE($1, fullname),
                sex = COALESCE($2, sex),
                avatar = COALESCE($3, avatar),
                tel = COALESCE($4, tel),
                email = COALESCE($5, email)
            WHERE admin_id = $6
            "#,
        )
        .bind(&profile.fullname)
        .bind(&profile.sex)
        .bind(&profile.avatar)
        .bind(&profile.tel)
        .bind(&profile.email)
        .bind(admin_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_profile_and_role(
        &self,
        admin_id: i64,
        profile: &ProfileUpdate,
        role_id: i32,
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE admin
            SET fullname = COALESCE($1, fullname),
                sex = COALESCE($2, sex),
                avatar = COALESCE($3, avatar),
                tel = COALESCE($4, tel),
                email = COALESCE($5, email)
            WHERE admin_id = $6
            "#,
        )
        .bind(&profile.fullname)
        .bind(&profile.sex)
        .bind(&profile.avatar)
        .bind(&profile.tel)
        .bind(&profile.email)
        .bind(admin_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        sqlx::query(
            r#"
            INSERT INTO admin_role (admin_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (admin_id) DO UPDATE SET role_id = EXCLUDED.role_id
            "#,
        )
        .bind(admin_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}
