use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::auth::guard::{ROLE_ADMIN, ROLE_OPERATOR, ROLE_SUPER_ADMIN};
use crate::database::{AdminEntity, AdminStore, AdminSummary, NewAdmin, ProfileUpdate, StoreError};

/// 内存中的管理员存储，用于测试或嵌入使用
pub struct MemoryAdminStore {
    state: RwLock<MemoryState>,
}

struct MemoryState {
    next_id: i64,
    admins: BTreeMap<i64, AdminEntity>,
    assignments: HashMap<i64, i32>,
    roles: BTreeMap<i32, String>,
}

impl Default for MemoryAdminStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdminStore {
    /// 与迁移脚本相同的三个角色
    pub fn new() -> Self {
        let roles = BTreeMap::from([
            (ROLE_SUPER_ADMIN, "super_admin".to_string()),
            (ROLE_ADMIN, "admin".to_string()),
            (ROLE_OPERATOR, "operator".to_string()),
        ]);

        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                admins: BTreeMap::new(),
                assignments: HashMap::new(),
                roles,
            }),
        }
    }
}

fn apply_profile(admin: &mut AdminEntity, profile: &ProfileUpdate) {
    if let Some(fullname) = &profile.fullname {
        admin.fullname = Some(fullname.clone());
    }
    if let Some(sex) = &profile.sex {
        admin.sex = Some(sex.clone());
    }
    if let Some(avatar) = &profile.avatar {
        admin.avatar = Some(avatar.clone());
    }
    if let Some(tel) = &profile.tel {
        admin.tel = Some(tel.clone());
    }
    if let Some(email) = &profile.email {
        admin.email = Some(email.clone());
    }
}

#[async_trait]
impl AdminStore for MemoryAdminStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminEntity>, StoreError> {
        let state = self.state.read().await;
        Ok(state.admins.values().find(|a| a.username == username).cloned())
    }

    async fn find_by_id(&self, admin_id: i64) -> Result<Option<AdminEntity>, StoreError> {
        Ok(self.state.read().await.admins.get(&admin_id).cloned())
    }

    async fn create_admin(&self, admin: &NewAdmin, role_id: i32) -> Result<i64, StoreError> {
        let mut state = self.state.write().await;

        if state.admins.values().any(|a| a.username == admin.username) {
            return Err(StoreError::UniqueViolation("admin_username_key".into()));
        }

        let admin_id = state.next_id;
        state.next_id += 1;
        state.admins.insert(
            admin_id,
            AdminEntity {
                admin_id,
                username: admin.username.clone(),
                password_hash: admin.password_hash.clone(),
                fullname: admin.fullname.clone(),
                sex: admin.sex.clone(),
                tel: admin.tel.clone(),
                email: None,
                avatar: admin.avatar.clone(),
                login_count: 0,
                login_time: None,
                create_time: Utc::now(),
            },
        );
        state.assignments.insert(admin_id, role_id);

        Ok(admin_id)
    }

    async fn record_login(&self, admin_id: i64) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        match state.admins.get_mut(&admin_id) {
            Some(admin) => {
                admin.login_count += 1;
                admin.login_time = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_role(&self, admin_id: i64) -> Result<Option<i32>, StoreError> {
        Ok(self.state.read().await.assignments.get(&admin_id).copied())
    }

    async fn role_exists(&self, role_id: i32) -> Result<bool, StoreError> {
        Ok(self.state.read().await.roles.contains_key(&role_id))
    }

    async fn list_admins(&self) -> Result<Vec<AdminSummary>, StoreError> {
        let state = self.state.read().await;
        let admins = state
            .admins
            .values()
            .map(|a| {
                let role = state.assignments.get(&a.admin_id).copied();
                AdminSummary {
                    admin_id: a.admin_id,
                    username: a.username.clone(),
                    fullname: a.fullname.clone(),
                    email: a.email.clone(),
                    sex: a.sex.clone(),
                    avatar: a.avatar.clone(),
                    tel: a.tel.clone(),
                    login_time: a.login_time,
                    login_count: a.login_count,
                    role,
                    role_name: role.and_then(|r| state.roles.get(&r).cloned()),
                }
            })
            .collect();

        Ok(admins)
    }

    async fn delete_admin(&self, admin_id: i64) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        state.assignments.remove(&admin_id);
        Ok(state.admins.remove(&admin_id).map_or(0, |_| 1))
    }

    async fn update_profile(&self, admin_id: i64, profile: &ProfileUpdate) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        match state.admins.get_mut(&admin_id) {
            Some(admin) => {
                apply_profile(admin, profile);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_profile_and_role(
        &self,
        admin_id: i64,
        profile: &ProfileUpdate,
        role_id: i32,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let Some(admin) = state.admins.get_mut(&admin_id) else {
            return Ok(0);
        };
        apply_profile(admin, profile);
        state.assignments.insert(admin_id, role_id);
        Ok(1)
    }
}
