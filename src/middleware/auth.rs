use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{AppState, error::AppError};

/// 校验 `Authorization: Bearer <token>`，通过后把 `Claims` 放进请求扩展
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let claims = state.tokens.verify(bearer.token())?;
    tracing::debug!("Authenticated admin {} with role {}", claims.id, claims.role);

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
