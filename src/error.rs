use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::schema::ApiResponse;
use crate::database::StoreError;
use crate::utils::error_codes;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("账号已经存在")]
    DuplicateAccount,
    #[error("账号不存在")]
    AccountNotFound,
    #[error("账号或者密码错误")]
    InvalidCredentials,
    #[error("令牌无效或已过期")]
    InvalidToken,
    #[error("无权限执行该操作")]
    Unauthorized,
    #[error("写入失败")]
    StoreWriteFailed,
    #[error("{0}")]
    Validation(String),
    #[error("数据库错误: {0}")]
    Store(StoreError),
    #[error("内部服务器错误: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => AppError::DuplicateAccount,
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn code(&self) -> i32 {
        match self {
            AppError::DuplicateAccount => error_codes::USER_EXISTS,
            AppError::AccountNotFound => error_codes::NOT_FOUND,
            AppError::InvalidCredentials => error_codes::AUTH_FAILED,
            AppError::InvalidToken => error_codes::INVALID_TOKEN,
            AppError::Unauthorized => error_codes::PERMISSION_DENIED,
            AppError::StoreWriteFailed => error_codes::WRITE_FAILED,
            AppError::Validation(_) => error_codes::VALIDATION_ERROR,
            AppError::Store(_) | AppError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// 业务失败统一返回 200，令牌和权限问题使用独立的状态码
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            // 不向客户端暴露数据库细节
            AppError::Store(e) => {
                tracing::error!("Store failure: {}", e);
                "数据库错误".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal failure: {}", e);
                "内部服务器错误".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ApiResponse::<()>::error(self.code(), msg));

        (status, body).into_response()
    }
}
