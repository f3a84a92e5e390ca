use serde::{Deserialize, Serialize};

use crate::database::ProfileUpdate;

// 注册请求，角色由服务端决定，请求中的 role 字段会被忽略
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub fullname: Option<String>,
    pub sex: Option<String>,
    pub tel: Option<String>,
}

// 注册响应
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub id: i64,
    pub role: i32,
    pub expires_at: i64,
}

// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// 登录响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub expires_at: i64,
}

// 按账户 id 操作的请求（删除、查询资料）
#[derive(Debug, Deserialize)]
pub struct AdminIdRequest {
    pub id: i64,
}

// 超级管理员修改任意账户的资料和角色
#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub id: i64,
    pub fullname: Option<String>,
    pub sex: Option<String>,
    pub avatar: Option<String>,
    pub tel: Option<String>,
    pub email: Option<String>,
    pub role: i32,
}

impl UpdateAdminRequest {
    pub fn profile(&self) -> ProfileUpdate {
        ProfileUpdate {
            fullname: self.fullname.clone(),
            sex: self.sex.clone(),
            avatar: self.avatar.clone(),
            tel: self.tel.clone(),
            email: self.email.clone(),
        }
    }
}

// 修改本账户资料，目标账户只来自令牌
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub sex: Option<String>,
    pub avatar: Option<String>,
    pub tel: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateAccountRequest> for ProfileUpdate {
    fn from(req: UpdateAccountRequest) -> Self {
        ProfileUpdate {
            fullname: req.fullname,
            sex: req.sex,
            avatar: req.avatar,
            tel: req.tel,
            email: req.email,
        }
    }
}
