use axum::Json;
use bcrypt::{non_truncating_hash, non_truncating_verify};
use serde::Serialize;

use crate::api::schema::ApiResponse;

/// bcrypt 输入上限 72 字节，包含结尾的 0 字节
pub const MAX_PASSWORD_BYTES: usize = 71;

// 超过上限时返回 `BcryptError::Truncation`，不会静默截断
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    non_truncating_hash(password.as_bytes(), cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    non_truncating_verify(password.as_bytes(), hash)
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 无返回数据的成功响应
pub fn ok_to_api_response(msg: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: msg.to_string(),
        resp_data: None,
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse::error(code, msg))
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INVALID_TOKEN: i32 = 1006;
    pub const WRITE_FAILED: i32 = 1007;
    pub const INTERNAL_ERROR: i32 = 5000;
}
