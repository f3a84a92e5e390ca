use crate::{
    AppState,
    api::schema::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateAccountRequest,
        UpdateAdminRequest,
    },
    auth::{Claims, Operation, guard::ROLE_OPERATOR},
    database::{AdminEntity, AdminSummary, NewAdmin, ProfileUpdate},
    error::AppError,
    utils::{MAX_PASSWORD_BYTES, hash_password, verify_password},
};

const MAX_USERNAME_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 6;

fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "账户名长度必须在1到{}个字符之间",
            MAX_USERNAME_LEN
        )));
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(AppError::Validation(
            "账户名格式无效，只允许使用字母、数字和下划线".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "密码长度不能少于{}个字符",
            MIN_PASSWORD_LEN
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "密码长度不能超过{}个字节",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

fn hash(state: &AppState, password: &str) -> Result<String, AppError> {
    hash_password(password, state.config.bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

/// 注册管理员，角色固定为运营人员
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
    let username = req.username.trim().to_string();
    validate_credentials(&username, &req.password)?;

    if state.store.find_by_username(&username).await?.is_some() {
        return Err(AppError::DuplicateAccount);
    }

    let new_admin = NewAdmin {
        username,
        password_hash: hash(state, &req.password)?,
        fullname: req.fullname,
        sex: req.sex,
        tel: req.tel,
        avatar: Some(state.config.default_avatar.clone()),
    };

    // 并发注册时由唯一约束兜底，冲突会转换为 DuplicateAccount
    let id = state.store.create_admin(&new_admin, ROLE_OPERATOR).await?;
    tracing::info!("Registered admin {} ({})", new_admin.username, id);

    let (token, expires_at) = state.tokens.issue(id, &new_admin.username, ROLE_OPERATOR)?;

    Ok(RegisterResponse {
        token,
        id,
        role: ROLE_OPERATOR,
        expires_at,
    })
}

pub async fn login(state: &AppState, req: LoginRequest) -> Result<LoginResponse, AppError> {
    let admin = state
        .store
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AppError::AccountNotFound)?;

    let valid = match verify_password(&req.password, &admin.password_hash) {
        Ok(valid) => valid,
        // 超长密码不可能与已存储的密码一致
        Err(bcrypt::BcryptError::Truncation(_)) => false,
        Err(e) => return Err(AppError::Internal(format!("failed to verify password: {}", e))),
    };
    if !valid {
        tracing::info!("Invalid password for admin {}", admin.admin_id);
        return Err(AppError::InvalidCredentials);
    }

    if state.store.record_login(admin.admin_id).await? == 0 {
        return Err(AppError::StoreWriteFailed);
    }

    let role = match state.store.find_role(admin.admin_id).await? {
        Some(role) => role,
        None => {
            tracing::warn!("Admin {} has no role assignment, using operator", admin.admin_id);
            ROLE_OPERATOR
        }
    };

    let (token, expires_at) = state.tokens.issue(admin.admin_id, &admin.username, role)?;

    Ok(LoginResponse {
        token,
        id: admin.admin_id,
        expires_at,
    })
}

pub async fn list(state: &AppState, claims: &Claims) -> Result<Vec<AdminSummary>, AppError> {
    state.guard.require(claims, Operation::ViewAccounts)?;
    Ok(state.store.list_admins().await?)
}

pub async fn info(state: &AppState, claims: &Claims, id: i64) -> Result<AdminEntity, AppError> {
    state.guard.require(claims, Operation::ViewAccounts)?;
    state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::AccountNotFound)
}

pub async fn delete(state: &AppState, claims: &Claims, id: i64) -> Result<(), AppError> {
    state.guard.require(claims, Operation::DeleteAccount)?;

    if state.store.delete_admin(id).await? == 0 {
        return Err(AppError::StoreWriteFailed);
    }

    tracing::info!("Admin {} deleted admin {}", claims.id, id);
    Ok(())
}

/// 修改任意账户的资料和角色，仅限高权限角色
pub async fn update(state: &AppState, claims: &Claims, req: UpdateAdminRequest) -> Result<(), AppError> {
    state.guard.require(claims, Operation::UpdateAccount)?;

    if !state.store.role_exists(req.role).await? {
        return Err(AppError::Validation(format!("角色 {} 不存在", req.role)));
    }

    let profile = req.profile();
    if state
        .store
        .update_profile_and_role(req.id, &profile, req.role)
        .await?
        == 0
    {
        return Err(AppError::StoreWriteFailed);
    }

    tracing::info!(
        "Admin {} updated admin {} with role {}",
        claims.id,
        req.id,
        req.role
    );
    Ok(())
}

/// 修改本账户资料，目标账户只取自令牌
pub async fn update_account(
    state: &AppState,
    claims: &Claims,
    req: UpdateAccountRequest,
) -> Result<(), AppError> {
    state.guard.require(claims, Operation::UpdateOwnProfile)?;

    let profile = ProfileUpdate::from(req);
    if state.store.update_profile(claims.id, &profile).await? == 0 {
        return Err(AppError::StoreWriteFailed);
    }

    Ok(())
}

/// 启动时创建超级管理员，已存在则跳过
pub async fn ensure_super_admin(state: &AppState, username: &str, password: &str) -> Result<(), AppError> {
    validate_credentials(username, password)?;

    if state.store.find_by_username(username).await?.is_some() {
        tracing::debug!("Super admin {} already exists", username);
        return Ok(());
    }

    let new_admin = NewAdmin {
        username: username.to_string(),
        password_hash: hash(state, password)?,
        fullname: None,
        sex: None,
        tel: None,
        avatar: Some(state.config.default_avatar.clone()),
    };
    let role = state.guard.elevated_role();
    let id = state.store.create_admin(&new_admin, role).await?;
    tracing::info!("Created super admin {} ({}) with role {}", username, id, role);

    Ok(())
}
