use axum::{
    extract::{Extension, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    api::{
        extract::AppJson,
        operations::admin as operations,
        schema::{AdminIdRequest, LoginRequest, RegisterRequest, UpdateAccountRequest, UpdateAdminRequest},
    },
    auth::Claims,
    error::AppError,
    utils::{ok_to_api_response, success_to_api_response},
};

/// 管理员注册
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let resp = operations::register(&state, req).await?;
    Ok(success_to_api_response(resp))
}

/// 管理员登录
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let resp = operations::login(&state, req).await?;
    Ok(success_to_api_response(resp))
}

/// 获取管理员列表
#[axum::debug_handler]
pub async fn list(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let admins = operations::list(&state, &claims).await?;
    Ok(success_to_api_response(admins))
}

/// 删除管理员
#[axum::debug_handler]
pub async fn delete(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    AppJson(req): AppJson<AdminIdRequest>,
) -> Result<impl IntoResponse, AppError> {
    operations::delete(&state, &claims, req.id).await?;
    Ok(ok_to_api_response("删除成功"))
}

/// 获取管理员资料
#[axum::debug_handler]
pub async fn info(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    AppJson(req): AppJson<AdminIdRequest>,
) -> Result<impl IntoResponse, AppError> {
    let admin = operations::info(&state, &claims, req.id).await?;
    Ok(success_to_api_response(admin))
}

/// 修改任意管理员资料和角色
#[axum::debug_handler]
pub async fn update(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    operations::update(&state, &claims, req).await?;
    Ok(ok_to_api_response("修改成功"))
}

/// 修改本账户资料
#[axum::debug_handler]
pub async fn update_account(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    operations::update_account(&state, &claims, req).await?;
    Ok(ok_to_api_response("修改成功"))
}
