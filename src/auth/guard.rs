use crate::auth::Claims;
use crate::error::AppError;

pub const ROLE_SUPER_ADMIN: i32 = 1;
pub const ROLE_ADMIN: i32 = 2;
/// 注册时的默认角色（运营人员）
pub const ROLE_OPERATOR: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// 查看账户列表或资料
    ViewAccounts,
    /// 修改本账户资料，目标 id 取自令牌
    UpdateOwnProfile,
    /// 修改任意账户的资料和角色
    UpdateAccount,
    DeleteAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// 按角色判断写操作是否允许
#[derive(Debug, Clone, Copy)]
pub struct Guard {
    elevated_role: i32,
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(ROLE_SUPER_ADMIN)
    }
}

impl Guard {
    pub fn new(elevated_role: i32) -> Self {
        Self { elevated_role }
    }

    pub fn elevated_role(&self) -> i32 {
        self.elevated_role
    }

    pub fn authorize(&self, acting_role: i32, operation: Operation) -> Decision {
        match operation {
            Operation::ViewAccounts | Operation::UpdateOwnProfile => Decision::Allow,
            Operation::UpdateAccount | Operation::DeleteAccount => {
                if acting_role == self.elevated_role {
                    Decision::Allow
                } else {
                    Decision::Deny
                }
            }
        }
    }

    pub fn require(&self, claims: &Claims, operation: Operation) -> Result<(), AppError> {
        match self.authorize(claims.role, operation) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                tracing::warn!(
                    "Denied {:?} for admin {} with role {}",
                    operation,
                    claims.id,
                    claims.role
                );
                Err(AppError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_elevated_role_may_update_other_accounts() {
        let guard = Guard::default();
        assert_eq!(guard.authorize(ROLE_OPERATOR, Operation::UpdateAccount), Decision::Deny);
        assert_eq!(guard.authorize(ROLE_ADMIN, Operation::UpdateAccount), Decision::Deny);
        assert_eq!(guard.authorize(ROLE_SUPER_ADMIN, Operation::UpdateAccount), Decision::Allow);
    }

    #[test]
    fn deletion_requires_elevated_role() {
        let guard = Guard::default();
        assert_eq!(guard.authorize(ROLE_OPERATOR, Operation::DeleteAccount), Decision::Deny);
        assert_eq!(guard.authorize(ROLE_SUPER_ADMIN, Operation::DeleteAccount), Decision::Allow);
    }

    #[test]
    fn any_role_may_edit_own_profile_and_read() {
        let guard = Guard::default();
        for role in [ROLE_SUPER_ADMIN, ROLE_ADMIN, ROLE_OPERATOR, 99] {
            assert_eq!(guard.authorize(role, Operation::UpdateOwnProfile), Decision::Allow);
            assert_eq!(guard.authorize(role, Operation::ViewAccounts), Decision::Allow);
        }
    }

    #[test]
    fn elevated_role_is_configurable() {
        let guard = Guard::new(ROLE_ADMIN);
        assert_eq!(guard.authorize(ROLE_ADMIN, Operation::UpdateAccount), Decision::Allow);
        assert_eq!(guard.authorize(ROLE_SUPER_ADMIN, Operation::UpdateAccount), Decision::Deny);
    }

    #[test]
    fn require_maps_deny_to_unauthorized() {
        let claims = Claims {
            id: 7,
            username: "op".into(),
            role: ROLE_OPERATOR,
            iat: 0,
            exp: 0,
        };
        let result = Guard::default().require(&claims, Operation::UpdateAccount);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
